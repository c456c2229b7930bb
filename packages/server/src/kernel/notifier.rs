//! In-process broadcast of domain mutations to real-time listeners.
//!
//! Every mutation publishes a named notification (`profesor.created`,
//! `cubiculo.deleted`, ...) with a JSON payload. Publishing is
//! fire-and-forget: with no listeners the notification is dropped, and slow
//! listeners lag rather than block the publisher.
//!
//! # Usage
//!
//! Producers (domain actions):
//!   notifier.publish("cubiculo.deleted", json!({"codigo": "A-12-1"}));
//!
//! Consumers (SSE endpoint):
//!   let rx = notifier.subscribe();

use serde::Serialize;
use serde_json::Value;
use tokio::sync::broadcast;
use tracing::{debug, warn};

/// A broadcast notification
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct Notification {
    pub event: String,
    pub payload: Value,
}

/// Publish-only channel shared by all request handlers.
///
/// Thread-safe, cloneable. Clones publish to the same listeners.
#[derive(Clone)]
pub struct Notifier {
    sender: broadcast::Sender<Notification>,
}

impl Notifier {
    /// Create a new Notifier with default capacity (256 notifications).
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish a notification. Never fails the caller.
    pub fn publish<T: Serialize>(&self, event: &str, payload: &T) {
        let payload = match serde_json::to_value(payload) {
            Ok(value) => value,
            Err(e) => {
                warn!(event, error = %e, "Failed to serialize notification payload");
                return;
            }
        };

        // Ignore send errors (no active receivers)
        let delivered = self
            .sender
            .send(Notification {
                event: event.to_string(),
                payload,
            })
            .unwrap_or(0);

        debug!(event, listeners = delivered, "Notification published");
    }

    pub fn subscribe(&self) -> broadcast::Receiver<Notification> {
        self.sender.subscribe()
    }

    pub fn listener_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl Default for Notifier {
    fn default() -> Self {
        Self::new()
    }
}
