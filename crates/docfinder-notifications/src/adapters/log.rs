use async_trait::async_trait;

use super::{NotificationAdapter, RenderedContent, SendResult};
use crate::error::NotificationError;
use crate::types::Notification;

/// Writes notifications to the log instead of delivering them.
///
/// Used when no SMTP relay is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogAdapter;

#[async_trait]
impl NotificationAdapter for LogAdapter {
    async fn send(
        &self,
        notification: &Notification,
        content: &RenderedContent,
    ) -> Result<SendResult, NotificationError> {
        let to = notification
            .recipient
            .email
            .as_deref()
            .ok_or(NotificationError::RecipientNotFound)?;

        tracing::info!(
            notification_id = %notification.id,
            to,
            subject = content.subject.as_deref().unwrap_or_default(),
            body = %content.body,
            "notification logged"
        );

        Ok(SendResult {
            success: true,
            external_id: None,
            error: None,
        })
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
