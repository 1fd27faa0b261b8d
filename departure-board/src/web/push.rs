//! WebSocket push feed.
//!
//! Each connection gets its own broadcast session. Frames from the client
//! are read only to notice when the connection goes away.

use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use futures::stream::SplitSink;
use futures::{SinkExt, StreamExt};
use tower_http::services::ServeDir;
use tracing::{debug, error, info};

use super::state::AppState;
use crate::sessions::{ChannelError, PushChannel, SessionManager};

/// Upgrade to a WebSocket and start pushing departures.
pub(super) async fn push_feed(ws: WebSocketUpgrade, State(state): State<AppState>) -> Response {
    subscribe(ws, state.sessions)
}

/// The root path: a WebSocket upgrade joins the feed, anything else is a
/// static asset.
pub(super) async fn root(
    ws: Option<WebSocketUpgrade>,
    State(state): State<AppState>,
    mut assets: ServeDir,
    request: Request,
) -> Response {
    if let Some(ws) = ws {
        return subscribe(ws, state.sessions);
    }

    match assets.try_call(request).await {
        Ok(response) => response.into_response(),
        Err(e) => {
            error!(error = %e, "failed to serve static asset");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}

fn subscribe(ws: WebSocketUpgrade, sessions: Arc<SessionManager>) -> Response {
    ws.on_upgrade(move |socket| serve_subscriber(socket, sessions))
}

/// Write half of a WebSocket connection.
struct WebSocketChannel(SplitSink<WebSocket, Message>);

impl PushChannel for WebSocketChannel {
    async fn send(&mut self, payload: String) -> Result<(), ChannelError> {
        // A failed WebSocket write leaves the connection unusable
        self.0.send(Message::Text(payload)).await.map_err(|e| {
            debug!(error = %e, "websocket write failed");
            ChannelError::Closed
        })
    }
}

async fn serve_subscriber(socket: WebSocket, sessions: Arc<SessionManager>) {
    let (sink, mut stream) = socket.split();
    let id = sessions.open(WebSocketChannel(sink));
    info!(%id, active = sessions.active_count(), "subscriber connected");

    while let Some(message) = stream.next().await {
        match message {
            Ok(Message::Close(_)) => break,
            // Client messages are not part of the feed
            Ok(_) => {}
            Err(e) => {
                debug!(%id, error = %e, "websocket read failed");
                break;
            }
        }
    }

    sessions.close(id).await;
    info!(%id, "subscriber disconnected");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::board::DepartureBoard;
    use crate::departures::FixedClock;
    use crate::domain::{DepartureTime, ScheduleRecord};
    use crate::schedules::StaticSource;
    use crate::web::create_router;
    use axum::body::Body;
    use chrono::NaiveDate;
    use std::net::SocketAddr;
    use std::path::Path;
    use std::time::Duration;
    use tokio::net::TcpListener;
    use tokio::time::{sleep, timeout};
    use tokio_tungstenite::tungstenite::Message as ClientMessage;
    use tokio_tungstenite::{MaybeTlsStream, WebSocketStream, connect_async};

    const TICK: Duration = Duration::from_millis(50);
    const WAIT: Duration = Duration::from_secs(5);

    type Client = WebSocketStream<MaybeTlsStream<tokio::net::TcpStream>>;

    fn state() -> AppState {
        let now = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(8, 15, 0)
            .unwrap();
        let records = vec![
            ScheduleRecord::new(1, "A", "B", DepartureTime::from_hm(9, 5).unwrap(), 60),
            ScheduleRecord::new(2, "B", "C", DepartureTime::from_hm(8, 0).unwrap(), 30),
        ];
        let board = DepartureBoard::new(
            Arc::new(StaticSource::new(records)),
            Arc::new(FixedClock(now)),
        );
        let sessions = Arc::new(SessionManager::new(board.clone(), TICK));
        AppState::new(board, sessions)
    }

    async fn serve(state: AppState, static_dir: &Path) -> SocketAddr {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let app = create_router(state, static_dir);
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });
        addr
    }

    /// Next text frame from the server, skipping control frames.
    async fn next_text(client: &mut Client) -> String {
        loop {
            let frame = timeout(WAIT, client.next())
                .await
                .expect("timed out waiting for a frame")
                .expect("connection ended")
                .unwrap();
            match frame {
                ClientMessage::Text(text) => return text.to_string(),
                ClientMessage::Ping(_) | ClientMessage::Pong(_) => {}
                other => panic!("unexpected frame: {other:?}"),
            }
        }
    }

    async fn wait_for_no_sessions(sessions: &SessionManager) {
        timeout(WAIT, async {
            while sessions.active_count() != 0 {
                sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("session was not closed");
    }

    fn assert_ranked(payload: &str) {
        let list: serde_json::Value = serde_json::from_str(payload).unwrap();
        assert_eq!(list.as_array().unwrap().len(), 2);
        assert_eq!(list[0]["busNumber"], 2);
        assert_eq!(list[0]["nextDeparture"]["time"], "08:30:00");
        assert_eq!(list[0]["nextDeparture"]["remaining"], "00:15:00");
        assert_eq!(list[1]["busNumber"], 1);
    }

    #[tokio::test]
    async fn pushes_ranked_list_until_client_closes() {
        let dir = tempfile::tempdir().unwrap();
        let state = state();
        let sessions = Arc::clone(&state.sessions);
        let addr = serve(state, dir.path()).await;

        let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
        assert_ranked(&next_text(&mut client).await);
        assert_eq!(sessions.active_count(), 1);

        // Client chatter is ignored; the feed carries on
        client
            .send(ClientMessage::Text("hello".into()))
            .await
            .unwrap();
        assert_ranked(&next_text(&mut client).await);
        assert_eq!(sessions.active_count(), 1);

        client.close(None).await.unwrap();
        wait_for_no_sessions(&sessions).await;
    }

    #[tokio::test]
    async fn dropped_connection_ends_session() {
        let dir = tempfile::tempdir().unwrap();
        let state = state();
        let sessions = Arc::clone(&state.sessions);
        let addr = serve(state, dir.path()).await;

        let (mut client, _) = connect_async(format!("ws://{addr}/ws")).await.unwrap();
        next_text(&mut client).await;
        assert_eq!(sessions.active_count(), 1);

        drop(client);
        wait_for_no_sessions(&sessions).await;
    }

    #[tokio::test]
    async fn root_path_accepts_upgrade() {
        let dir = tempfile::tempdir().unwrap();
        let state = state();
        let sessions = Arc::clone(&state.sessions);
        let addr = serve(state, dir.path()).await;

        let (mut client, _) = connect_async(format!("ws://{addr}/")).await.unwrap();
        assert_ranked(&next_text(&mut client).await);

        client.close(None).await.unwrap();
        wait_for_no_sessions(&sessions).await;
    }

    #[tokio::test]
    async fn root_path_without_upgrade_serves_assets() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("index.html"), "<h1>Departures</h1>").unwrap();
        let request = Request::builder().uri("/").body(Body::empty()).unwrap();

        let response = root(None, State(state()), ServeDir::new(dir.path()), request).await;
        assert_eq!(response.status(), StatusCode::OK);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert_eq!(&bytes[..], b"<h1>Departures</h1>");
    }
}
