//! The departure board: one ranked snapshot per request.
//!
//! Both the pull endpoint and every broadcast tick go through
//! [`DepartureBoard::snapshot`], which loads the schedules, samples the
//! clock once and ranks every route against that instant. Async callers use
//! [`DepartureBoard::fetch`] and [`DepartureBoard::fetch_json`], which run
//! the same work on tokio's blocking pool since loading may touch the disk.

mod dto;

use std::sync::Arc;

use crate::departures::{Clock, rank_departures};
use crate::domain::DepartureError;
use crate::schedules::{ScheduleLoadError, ScheduleSource};

pub use dto::{DepartureResult, NextDepartureResult};

/// Errors that prevent producing a ranked snapshot.
#[derive(Debug, thiserror::Error)]
pub enum BoardError {
    /// Schedules could not be loaded
    #[error(transparent)]
    Load(#[from] ScheduleLoadError),

    /// A schedule could not produce a departure
    #[error(transparent)]
    Departure(#[from] DepartureError),

    /// The snapshot could not be encoded
    #[error("failed to encode departures: {0}")]
    Encode(#[from] serde_json::Error),

    /// The blocking snapshot task did not complete
    #[error("snapshot task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Computes ranked departure snapshots.
///
/// Cheap to clone; clones share the schedule source and clock.
#[derive(Clone)]
pub struct DepartureBoard {
    source: Arc<dyn ScheduleSource>,
    clock: Arc<dyn Clock>,
}

impl DepartureBoard {
    /// Create a new board.
    pub fn new(source: Arc<dyn ScheduleSource>, clock: Arc<dyn Clock>) -> Self {
        Self { source, clock }
    }

    /// Compute the ranked departure list as of now.
    ///
    /// Every route in the result is evaluated against the same instant.
    /// Nothing is retried; the caller decides what to do with a failure.
    pub fn snapshot(&self) -> Result<Vec<DepartureResult>, BoardError> {
        let schedules = self.source.load()?;
        let reference = self.clock.now();
        let ranked = rank_departures(&schedules, reference)?;

        Ok(ranked.iter().map(DepartureResult::from_ranked).collect())
    }

    /// Compute the ranked departure list as a JSON array.
    pub fn snapshot_json(&self) -> Result<String, BoardError> {
        let departures = self.snapshot()?;
        Ok(serde_json::to_string(&departures)?)
    }

    /// [`snapshot`](Self::snapshot) off the async worker threads.
    pub async fn fetch(&self) -> Result<Vec<DepartureResult>, BoardError> {
        let board = self.clone();
        tokio::task::spawn_blocking(move || board.snapshot()).await?
    }

    /// [`snapshot_json`](Self::snapshot_json) off the async worker threads.
    pub async fn fetch_json(&self) -> Result<String, BoardError> {
        let board = self.clone();
        tokio::task::spawn_blocking(move || board.snapshot_json()).await?
    }
}
