//! Supervisor connection state.
//!
//! A supervisor channel is outbound-only: the server pushes status updates
//! through a bounded channel to the socket's write task. Sends never block —
//! a full or closed channel counts a drop and the update is abandoned (the
//! next broadcast resynchronizes the supervisor).

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Instant;

use tokio::sync::mpsc;

/// A connected supervisor for one exam session.
pub struct SupervisorConnection {
    /// Unique connection ID.
    pub id: String,
    /// Exam session this supervisor observes (fixed at upgrade).
    exam_id: String,
    /// Send channel to the connection's WebSocket write task.
    tx: mpsc::Sender<Arc<String>>,
    /// When this connection was established.
    pub connected_at: Instant,
    /// Whether the client has responded since the last ping.
    pub is_alive: AtomicBool,
    /// Count of messages dropped due to a full or closed channel.
    dropped_messages: AtomicU64,
}

impl SupervisorConnection {
    /// Create a new supervisor connection.
    #[must_use]
    pub fn new(id: String, exam_id: String, tx: mpsc::Sender<Arc<String>>) -> Self {
        Self {
            id,
            exam_id,
            tx,
            connected_at: Instant::now(),
            is_alive: AtomicBool::new(true),
            dropped_messages: AtomicU64::new(0),
        }
    }

    /// The exam session this supervisor observes.
    #[must_use]
    pub fn exam_id(&self) -> &str {
        &self.exam_id
    }

    /// Enqueue a serialized status update.
    ///
    /// Returns `false` if the channel is full or closed, incrementing the
    /// dropped-message counter. Never blocks.
    pub fn send(&self, message: Arc<String>) -> bool {
        if self.tx.try_send(message).is_ok() {
            true
        } else {
            let _ = self.dropped_messages.fetch_add(1, Ordering::Relaxed);
            false
        }
    }

    /// Total messages dropped for this connection.
    #[must_use]
    pub fn drop_count(&self) -> u64 {
        self.dropped_messages.load(Ordering::Relaxed)
    }

    /// Mark the connection as alive (pong or any inbound frame received).
    pub fn mark_alive(&self) {
        self.is_alive.store(true, Ordering::Relaxed);
    }

    /// Check and reset the alive flag.
    ///
    /// Returns `true` if the connection was alive since the last check.
    pub fn check_alive(&self) -> bool {
        self.is_alive.swap(false, Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_connection() -> (SupervisorConnection, mpsc::Receiver<Arc<String>>) {
        let (tx, rx) = mpsc::channel(8);
        let conn = SupervisorConnection::new("sup_1".into(), "exam_1".into(), tx);
        (conn, rx)
    }

    #[test]
    fn create_connection() {
        let (conn, _rx) = make_connection();
        assert_eq!(conn.id, "sup_1");
        assert_eq!(conn.exam_id(), "exam_1");
        assert_eq!(conn.drop_count(), 0);
    }

    #[tokio::test]
    async fn send_delivers_message() {
        let (conn, mut rx) = make_connection();
        assert!(conn.send(Arc::new("update".into())));
        let msg = rx.recv().await.unwrap();
        assert_eq!(&*msg, "update");
    }

    #[tokio::test]
    async fn send_to_closed_channel_counts_drop() {
        let (tx, rx) = mpsc::channel(8);
        let conn = SupervisorConnection::new("sup_2".into(), "exam_1".into(), tx);
        drop(rx);
        assert!(!conn.send(Arc::new("update".into())));
        assert_eq!(conn.drop_count(), 1);
    }

    #[tokio::test]
    async fn send_to_full_channel_counts_drop() {
        let (tx, _rx) = mpsc::channel(1);
        let conn = SupervisorConnection::new("sup_3".into(), "exam_1".into(), tx);
        assert!(conn.send(Arc::new("first".into())));
        assert!(!conn.send(Arc::new("second".into())));
        assert_eq!(conn.drop_count(), 1);
    }

    #[test]
    fn mark_alive_and_check() {
        let (conn, _rx) = make_connection();
        assert!(conn.check_alive());
        assert!(!conn.check_alive());
        conn.mark_alive();
        assert!(conn.check_alive());
    }
}
