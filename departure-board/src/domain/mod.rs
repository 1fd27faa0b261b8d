//! Domain types for the departure board.
//!
//! Schedule records and the time-of-day type they are built from. Types
//! validate what they can at construction time; the recurrence interval is
//! validated when a departure is computed.

mod error;
mod schedule;
mod time;

pub use error::DepartureError;
pub use schedule::{RouteId, ScheduleRecord};
pub use time::{DepartureTime, TimeError, format_hms};
