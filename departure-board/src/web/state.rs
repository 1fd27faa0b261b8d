//! Application state for the web layer.

use std::sync::Arc;

use crate::board::DepartureBoard;
use crate::sessions::SessionManager;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Ranked snapshot source for pull requests
    pub board: DepartureBoard,

    /// Broadcast sessions for push subscribers
    pub sessions: Arc<SessionManager>,
}

impl AppState {
    /// Create a new app state.
    pub fn new(board: DepartureBoard, sessions: Arc<SessionManager>) -> Self {
        Self { board, sessions }
    }
}
