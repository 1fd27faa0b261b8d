//! Schedule sources backed by a JSON file or an in-memory list.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::domain::ScheduleRecord;

use super::error::ScheduleLoadError;

/// Supplies the current schedule collection.
///
/// Implementations hand out an immutable snapshot; callers rank against
/// that snapshot without further locking.
pub trait ScheduleSource: Send + Sync {
    fn load(&self) -> Result<Arc<[ScheduleRecord]>, ScheduleLoadError>;
}

/// Reads and parses a JSON schedule file on every load.
///
/// Edits to the file are picked up on the next pull or tick.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
}

impl JsonFileSource {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScheduleSource for JsonFileSource {
    fn load(&self) -> Result<Arc<[ScheduleRecord]>, ScheduleLoadError> {
        let data = std::fs::read_to_string(&self.path).map_err(|source| ScheduleLoadError::Io {
            path: self.path.clone(),
            source,
        })?;

        let records: Vec<ScheduleRecord> =
            serde_json::from_str(&data).map_err(|source| ScheduleLoadError::Parse {
                path: self.path.clone(),
                source,
            })?;

        Ok(records.into())
    }
}

/// A fixed, already-parsed schedule collection.
#[derive(Debug, Clone)]
pub struct StaticSource {
    records: Arc<[ScheduleRecord]>,
}

impl StaticSource {
    pub fn new(records: impl Into<Arc<[ScheduleRecord]>>) -> Self {
        Self {
            records: records.into(),
        }
    }
}

impl ScheduleSource for StaticSource {
    fn load(&self) -> Result<Arc<[ScheduleRecord]>, ScheduleLoadError> {
        Ok(Arc::clone(&self.records))
    }
}
