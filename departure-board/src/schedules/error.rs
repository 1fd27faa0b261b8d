//! Schedule source error types.

use std::path::PathBuf;

/// Errors that can occur when loading the schedule collection.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleLoadError {
    /// The schedule file could not be read
    #[error("failed to read schedules from {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The schedule file is not a valid schedule list
    #[error("failed to parse schedules from {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
