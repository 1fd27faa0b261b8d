//! Schedule collection sources.
//!
//! The board never owns the schedule data; it asks a [`ScheduleSource`]
//! for the current collection on every pull and every broadcast tick.

mod error;
mod snapshot;
mod source;

pub use error::ScheduleLoadError;
pub use snapshot::ScheduleSnapshot;
pub use source::{JsonFileSource, ScheduleSource, StaticSource};
