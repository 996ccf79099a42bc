pub mod email;
pub mod log;

use async_trait::async_trait;

use crate::error::NotificationError;
use crate::types::Notification;

/// Result of sending a notification
#[derive(Debug)]
pub struct SendResult {
    pub success: bool,
    pub external_id: Option<String>,
    pub error: Option<String>,
}

/// Rendered notification content
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedContent {
    pub subject: Option<String>,
    pub body: String,
    pub html_body: Option<String>,
}

/// Adapter for sending notifications
#[async_trait]
pub trait NotificationAdapter: Send + Sync {
    async fn send(
        &self,
        notification: &Notification,
        rendered_content: &RenderedContent,
    ) -> Result<SendResult, NotificationError>;

    /// Short name used in logs.
    fn name(&self) -> &'static str;
}

pub use email::{EmailAdapter, SmtpConfig};
pub use log::LogAdapter;
