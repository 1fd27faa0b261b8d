//! Push channels: where a session delivers its snapshots.

use std::future::Future;

use tokio::sync::mpsc;

/// Errors reported by a push channel.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChannelError {
    /// The subscriber is gone; the session must end
    #[error("channel closed")]
    Closed,

    /// A send failed but the channel may still be usable
    #[error("send failed: {0}")]
    Transport(String),
}

/// Server-to-subscriber half of a persistent connection.
pub trait PushChannel: Send + 'static {
    /// Deliver one serialized departure list.
    fn send(&mut self, payload: String) -> impl Future<Output = Result<(), ChannelError>> + Send;
}

/// In-process subscriber fed through a bounded queue.
impl PushChannel for mpsc::Sender<String> {
    async fn send(&mut self, payload: String) -> Result<(), ChannelError> {
        mpsc::Sender::send(self, payload)
            .await
            .map_err(|_| ChannelError::Closed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn mpsc_sender_delivers() {
        let (mut tx, mut rx) = mpsc::channel::<String>(4);
        PushChannel::send(&mut tx, "[]".to_string()).await.unwrap();
        assert_eq!(rx.recv().await.as_deref(), Some("[]"));
    }

    #[tokio::test]
    async fn mpsc_sender_reports_closed() {
        let (mut tx, rx) = mpsc::channel::<String>(4);
        drop(rx);
        assert_eq!(
            PushChannel::send(&mut tx, "[]".to_string()).await,
            Err(ChannelError::Closed)
        );
    }
}
