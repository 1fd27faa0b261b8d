//! Broadcast sessions: a live feed of the departure board per subscriber.
//!
//! Transport-agnostic. The web layer adapts WebSocket connections to
//! [`PushChannel`] and opens one session per connection.

mod channel;
mod manager;

pub use channel::{ChannelError, PushChannel};
pub use manager::{SessionId, SessionManager};
