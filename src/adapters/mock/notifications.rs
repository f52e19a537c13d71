use crate::ports::notifications::{
    Notification, NotificationDispatcher, QUEUE_EXCHANGE, QUEUE_ROUTING_KEY, Result, STREAM_TOPIC,
};
use async_trait::async_trait;
use std::sync::Mutex;

/// Mock implementation of NotificationDispatcher
///
/// Does not deliver anything. Records published notifications per channel
/// so tests can assert on them.
pub struct NotificationService {
    queue: Mutex<Vec<Notification>>,
    stream: Mutex<Vec<Notification>>,
}

impl NotificationService {
    pub fn new() -> Self {
        Self {
            queue: Mutex::new(Vec::new()),
            stream: Mutex::new(Vec::new()),
        }
    }

    /// Notifications published on the queue channel so far
    pub fn published_queue(&self) -> Vec<Notification> {
        self.queue.lock().unwrap().clone()
    }

    /// Notifications published on the stream channel so far
    pub fn published_stream(&self) -> Vec<Notification> {
        self.stream.lock().unwrap().clone()
    }
}

impl Default for NotificationService {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl NotificationDispatcher for NotificationService {
    /// Record a queue-channel publish (no actual delivery)
    async fn publish_queue(&self, notification: Notification) -> Result<()> {
        tracing::debug!(
            exchange = QUEUE_EXCHANGE,
            routing_key = QUEUE_ROUTING_KEY,
            "queue notification recorded"
        );
        self.queue.lock().unwrap().push(notification);
        Ok(())
    }

    /// Record a stream-channel publish (no actual delivery)
    async fn publish_stream(&self, notification: Notification) -> Result<()> {
        tracing::debug!(topic = STREAM_TOPIC, "stream notification recorded");
        self.stream.lock().unwrap().push(notification);
        Ok(())
    }
}
