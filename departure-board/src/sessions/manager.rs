//! Per-subscriber broadcast sessions.
//!
//! Each session owns one periodic task. On every tick the task computes a
//! fresh ranked snapshot and pushes the whole list to its channel. Sessions
//! never share timers, and one session's failures never reach another.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};
use std::time::Duration;

use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};
use tracing::{debug, trace, warn};

use super::channel::{ChannelError, PushChannel};
use crate::board::DepartureBoard;

/// Identity of one subscriber connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionId(u64);

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

/// A running session: its cancel signal and its task.
struct SessionHandle {
    cancel: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

type Registry = Mutex<HashMap<SessionId, SessionHandle>>;

/// Registry of active broadcast sessions.
pub struct SessionManager {
    board: DepartureBoard,
    interval: Duration,
    sessions: Arc<Registry>,
    next_id: AtomicU64,
}

impl SessionManager {
    /// Create a manager whose sessions tick every `interval`.
    pub fn new(board: DepartureBoard, interval: Duration) -> Self {
        Self {
            board,
            interval,
            sessions: Arc::new(Mutex::new(HashMap::new())),
            next_id: AtomicU64::new(1),
        }
    }

    /// Start a session pushing to `channel`.
    ///
    /// The first snapshot is sent one interval after opening. Must be
    /// called from within a tokio runtime.
    pub fn open<C: PushChannel>(&self, channel: C) -> SessionId {
        let id = SessionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let (cancel, cancelled) = oneshot::channel();

        // Hold the lock across spawn so the task cannot deregister before it is registered
        let mut sessions = lock(&self.sessions);
        let task = tokio::spawn(run_session(
            id,
            channel,
            self.board.clone(),
            self.interval,
            cancelled,
            Arc::downgrade(&self.sessions),
        ));
        sessions.insert(id, SessionHandle { cancel, task });
        debug!(%id, active = sessions.len(), "session opened");

        id
    }

    /// Stop a session and wait for its task to finish.
    ///
    /// Once this returns, the session sends nothing more. Returns `false`
    /// if the session had already ended.
    pub async fn close(&self, id: SessionId) -> bool {
        let handle = lock(&self.sessions).remove(&id);
        let Some(handle) = handle else {
            return false;
        };

        stop(id, handle).await;
        debug!(%id, "session closed");
        true
    }

    /// Stop every session.
    pub async fn shutdown(&self) {
        let handles: Vec<_> = lock(&self.sessions).drain().collect();
        let count = handles.len();

        for (id, handle) in handles {
            stop(id, handle).await;
        }
        debug!(count, "all sessions closed");
    }

    /// Number of active sessions.
    pub fn active_count(&self) -> usize {
        lock(&self.sessions).len()
    }

    /// Check whether a session is still active.
    pub fn is_active(&self, id: SessionId) -> bool {
        lock(&self.sessions).contains_key(&id)
    }
}

fn lock(registry: &Registry) -> MutexGuard<'_, HashMap<SessionId, SessionHandle>> {
    registry.lock().unwrap_or_else(PoisonError::into_inner)
}

async fn stop(id: SessionId, handle: SessionHandle) {
    // The task may already have exited on its own
    let _ = handle.cancel.send(());
    if handle.task.await.is_err_and(|e| e.is_panic()) {
        warn!(%id, "session task panicked");
    }
}

/// Body of one session's task.
async fn run_session<C: PushChannel>(
    id: SessionId,
    mut channel: C,
    board: DepartureBoard,
    interval: Duration,
    mut cancelled: oneshot::Receiver<()>,
    registry: Weak<Registry>,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + interval, interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        // A dropped sender also counts as cancellation
        tokio::select! {
            biased;
            _ = &mut cancelled => return,
            _ = ticker.tick() => {}
        }

        let payload = match board.fetch_json().await {
            Ok(payload) => payload,
            Err(e) => {
                warn!(%id, error = %e, "skipping tick: failed to compute departures");
                continue;
            }
        };

        let sent = tokio::select! {
            biased;
            _ = &mut cancelled => return,
            sent = channel.send(payload) => sent,
        };

        match sent {
            Ok(()) => trace!(%id, "snapshot sent"),
            Err(ChannelError::Closed) => {
                debug!(%id, "channel closed, ending session");
                if let Some(registry) = registry.upgrade() {
                    lock(&registry).remove(&id);
                }
                return;
            }
            Err(e) => warn!(%id, error = %e, "send failed, will retry next tick"),
        }
    }
}
