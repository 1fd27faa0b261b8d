//! Data transfer objects for web responses.
//!
//! The departure list itself is [`crate::board::DepartureResult`]; it is
//! shared with the push feed.

use serde::Serialize;

pub use crate::board::{DepartureResult, NextDepartureResult};

/// Error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error message
    pub error: String,
}
