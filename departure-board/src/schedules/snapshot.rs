//! Hot-reloadable schedule snapshot.

use std::sync::{Arc, PoisonError, RwLock};

use crate::domain::ScheduleRecord;

use super::error::ScheduleLoadError;
use super::source::ScheduleSource;

/// Schedule collection held in memory and swapped whole on refresh.
///
/// Readers always see either the previous or the new collection, never a
/// mix of both.
pub struct ScheduleSnapshot {
    current: RwLock<Arc<[ScheduleRecord]>>,
    origin: Box<dyn ScheduleSource>,
}

impl ScheduleSnapshot {
    /// Create a snapshot by loading from `origin`.
    ///
    /// Fails if the initial load fails.
    pub fn from_source(origin: impl ScheduleSource + 'static) -> Result<Self, ScheduleLoadError> {
        let records = origin.load()?;
        Ok(Self {
            current: RwLock::new(records),
            origin: Box::new(origin),
        })
    }

    /// Number of schedules in the current snapshot.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    /// Check if the current snapshot is empty.
    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    /// Reload from the origin.
    ///
    /// On success, replaces the current snapshot. On failure, the existing
    /// snapshot is preserved and the error is returned.
    pub fn refresh(&self) -> Result<usize, ScheduleLoadError> {
        let records = self.origin.load()?;
        let count = records.len();

        let mut guard = self.current.write().unwrap_or_else(PoisonError::into_inner);
        *guard = records;

        Ok(count)
    }

    fn read(&self) -> Arc<[ScheduleRecord]> {
        let guard = self.current.read().unwrap_or_else(PoisonError::into_inner);
        Arc::clone(&guard)
    }
}

impl ScheduleSource for ScheduleSnapshot {
    fn load(&self) -> Result<Arc<[ScheduleRecord]>, ScheduleLoadError> {
        Ok(self.read())
    }
}
