//! Domain error types.
//!
//! These errors represent schedule records that cannot produce a departure.
//! They are distinct from loading and transport errors.

use super::RouteId;

/// Errors raised while computing a departure from a schedule record.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DepartureError {
    /// The record violates its invariants (e.g. non-positive frequency)
    #[error("invalid schedule for route {route}: {reason}")]
    InvalidSchedule { route: String, reason: String },

    /// The computed instant falls outside the representable calendar
    #[error("departure out of representable range")]
    OutOfRange,
}

impl DepartureError {
    /// Attach a route identifier to an invalid-schedule error.
    ///
    /// Other variants pass through unchanged.
    pub fn for_route(self, route_id: &RouteId) -> Self {
        match self {
            DepartureError::InvalidSchedule { reason, .. } => DepartureError::InvalidSchedule {
                route: route_id.to_string(),
                reason,
            },
            other => other,
        }
    }
}
