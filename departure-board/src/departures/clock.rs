//! Reference-instant sources.
//!
//! All departure arithmetic happens on naive date-times in one fixed
//! reference zone. A [`Clock`] samples "now" in that zone once per
//! pull or broadcast tick.

use chrono::{FixedOffset, NaiveDateTime, Offset, Utc};

/// Source of the reference instant for a ranking pass.
pub trait Clock: Send + Sync {
    /// Current instant as wall-clock time in the reference zone.
    fn now(&self) -> NaiveDateTime;
}

/// Wall clock in a fixed UTC offset.
#[derive(Debug, Clone, Copy)]
pub struct SystemClock {
    offset: FixedOffset,
}

impl SystemClock {
    pub fn new(offset: FixedOffset) -> Self {
        Self { offset }
    }

    /// Clock in UTC.
    pub fn utc() -> Self {
        Self::new(Utc.fix())
    }

    pub fn offset(&self) -> FixedOffset {
        self.offset
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::utc()
    }
}

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        Utc::now().with_timezone(&self.offset).naive_local()
    }
}

/// Clock pinned to one instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub NaiveDateTime);

impl Clock for FixedClock {
    fn now(&self) -> NaiveDateTime {
        self.0
    }
}
