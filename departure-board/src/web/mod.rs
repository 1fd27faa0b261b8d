//! Web layer for the departure board.
//!
//! Provides the pull endpoint, the WebSocket push feed and static assets.

mod dto;
mod push;
mod routes;
mod state;

pub use dto::*;
pub use routes::{AppError, create_router};
pub use state::AppState;
