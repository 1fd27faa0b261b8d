//! HTTP route handlers.

use std::path::Path;

use axum::{
    Json, Router,
    extract::{Request, State, ws::WebSocketUpgrade},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tracing::error;

use crate::board::BoardError;

use super::dto::*;
use super::push::{push_feed, root};
use super::state::AppState;

/// Create the application router.
///
/// The push feed is reachable at `/ws` and as a WebSocket upgrade on `/`.
/// Other requests that match no route are served from `static_dir`.
pub fn create_router(state: AppState, static_dir: impl AsRef<Path>) -> Router {
    let assets = ServeDir::new(static_dir);
    let root_assets = assets.clone();

    Router::new()
        .route(
            "/",
            get(
                move |ws: Option<WebSocketUpgrade>, state: State<AppState>, request: Request| {
                    root(ws, state, root_assets.clone(), request)
                },
            ),
        )
        .route("/health", get(health))
        .route("/next-departure", get(next_departure))
        .route("/ws", get(push_feed))
        .fallback_service(assets)
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Ranked departures as of now.
async fn next_departure(
    State(state): State<AppState>,
) -> Result<Json<Vec<DepartureResult>>, AppError> {
    let departures = state.board.fetch().await?;
    Ok(Json(departures))
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    Internal { message: String },
}

impl From<BoardError> for AppError {
    fn from(e: BoardError) -> Self {
        // Callers only learn that it failed; the cause goes to the log
        error!(error = %e, "failed to compute departures");
        AppError::Internal {
            message: "unable to compute departures".to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
