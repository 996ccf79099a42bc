use async_trait::async_trait;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::error::NotificationError;
use crate::types::{Notification, SendNotificationRequest};

/// Submission side of notification dispatch.
///
/// `enqueue` only hands the job off; delivery happens elsewhere and its
/// outcome is never reported back to the caller.
#[async_trait]
pub trait NotificationQueue: Send + Sync {
    /// Queues a notification and returns its id.
    async fn enqueue(&self, request: SendNotificationRequest) -> Result<Uuid, NotificationError>;
}

/// In-process queue backed by an unbounded tokio channel.
#[derive(Debug, Clone)]
pub struct ChannelQueue {
    sender: mpsc::UnboundedSender<Notification>,
}

/// Receiving half of a [`ChannelQueue`], consumed by the processor.
pub type NotificationReceiver = mpsc::UnboundedReceiver<Notification>;

impl ChannelQueue {
    pub fn new() -> (Self, NotificationReceiver) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

#[async_trait]
impl NotificationQueue for ChannelQueue {
    async fn enqueue(&self, request: SendNotificationRequest) -> Result<Uuid, NotificationError> {
        let notification = Notification::from_request(request);
        let id = notification.id;
        self.sender
            .send(notification)
            .map_err(|_| NotificationError::QueueClosed)?;
        tracing::debug!(notification_id = %id, "notification queued");
        Ok(id)
    }
}
