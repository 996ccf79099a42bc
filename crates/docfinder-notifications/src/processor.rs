use std::sync::Arc;

use tracing::{info, warn};

use crate::adapters::NotificationAdapter;
use crate::error::NotificationError;
use crate::queue::NotificationReceiver;
use crate::templates::TemplateRenderer;
use crate::types::Notification;

/// Drains the notification channel, rendering and sending each job once.
///
/// Failed sends are logged and dropped.
pub struct NotificationProcessor {
    receiver: NotificationReceiver,
    templates: Arc<TemplateRenderer>,
    adapter: Arc<dyn NotificationAdapter>,
}

impl NotificationProcessor {
    pub fn new(
        receiver: NotificationReceiver,
        templates: Arc<TemplateRenderer>,
        adapter: Arc<dyn NotificationAdapter>,
    ) -> Self {
        Self {
            receiver,
            templates,
            adapter,
        }
    }

    /// Runs until every sender is dropped. Returns the number of jobs sent.
    pub async fn run(mut self) -> u64 {
        info!(adapter = self.adapter.name(), "Notification processor started");
        let mut sent = 0;

        while let Some(notification) = self.receiver.recv().await {
            match self.process_one(&notification).await {
                Ok(()) => sent += 1,
                Err(e) => warn!(
                    notification_id = %notification.id,
                    template = %notification.template_id,
                    error = %e,
                    "Notification send failed"
                ),
            }
        }

        info!(sent, "Notification processor stopped");
        sent
    }

    async fn process_one(&self, notification: &Notification) -> Result<(), NotificationError> {
        let content = self
            .templates
            .render(&notification.template_id, &notification.template_data)?;

        let result = self.adapter.send(notification, &content).await?;

        if result.success {
            info!(
                notification_id = %notification.id,
                channel = ?notification.channel,
                external_id = ?result.external_id,
                "Notification sent successfully"
            );
            Ok(())
        } else {
            Err(NotificationError::SendFailed(
                result.error.unwrap_or_else(|| "Unknown error".to_string()),
            ))
        }
    }
}
