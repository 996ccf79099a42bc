use async_trait::async_trait;
use lettre::{
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
    message::{Mailbox, MultiPart, header::ContentType},
    transport::smtp::authentication::Credentials,
};

use super::{NotificationAdapter, RenderedContent, SendResult};
use crate::error::NotificationError;
use crate::types::Notification;

pub const DEFAULT_SMTP_PORT: u16 = 587;

/// SMTP relay settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub from: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

/// Sends notifications through an SMTP relay.
pub struct EmailAdapter {
    from: Mailbox,
    mailer: AsyncSmtpTransport<Tokio1Executor>,
}

impl EmailAdapter {
    pub fn new(config: &SmtpConfig) -> Result<Self, NotificationError> {
        let from = config
            .from
            .parse::<Mailbox>()
            .map_err(|e| NotificationError::InvalidConfig(format!("Invalid from: {e}")))?;

        let mut builder = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.host)
            .map_err(|e| NotificationError::InvalidConfig(e.to_string()))?
            .port(config.port);

        if let (Some(username), Some(password)) = (&config.username, &config.password) {
            builder = builder.credentials(Credentials::new(username.clone(), password.clone()));
        }

        Ok(Self {
            from,
            mailer: builder.build(),
        })
    }
}

fn build_message(
    from: &Mailbox,
    notification: &Notification,
    content: &RenderedContent,
) -> Result<Message, NotificationError> {
    let to = notification
        .recipient
        .email
        .as_ref()
        .ok_or(NotificationError::RecipientNotFound)?
        .parse::<Mailbox>()
        .map_err(|e| NotificationError::SendFailed(format!("Invalid to: {e}")))?;

    let builder = Message::builder()
        .from(from.clone())
        .to(to)
        .subject(content.subject.as_deref().unwrap_or("Notification"));

    let message = match &content.html_body {
        Some(html) => builder.multipart(MultiPart::alternative_plain_html(
            content.body.clone(),
            html.clone(),
        )),
        None => builder
            .header(ContentType::TEXT_PLAIN)
            .body(content.body.clone()),
    };
    message.map_err(|e| NotificationError::SendFailed(e.to_string()))
}

#[async_trait]
impl NotificationAdapter for EmailAdapter {
    async fn send(
        &self,
        notification: &Notification,
        content: &RenderedContent,
    ) -> Result<SendResult, NotificationError> {
        let email = build_message(&self.from, notification, content)?;

        match self.mailer.send(email).await {
            Ok(response) => Ok(SendResult {
                success: true,
                external_id: Some(response.message().collect::<Vec<_>>().join(" ")),
                error: None,
            }),
            Err(e) => Ok(SendResult {
                success: false,
                external_id: None,
                error: Some(e.to_string()),
            }),
        }
    }

    fn name(&self) -> &'static str {
        "smtp"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{NotificationChannel, NotificationRecipient, SendNotificationRequest};
    use std::collections::HashMap;

    fn config() -> SmtpConfig {
        SmtpConfig {
            host: "smtp.example.com".into(),
            port: DEFAULT_SMTP_PORT,
            from: "DocFinder <no-reply@example.com>".into(),
            username: None,
            password: None,
        }
    }

    fn notification(email: Option<&str>) -> Notification {
        Notification::from_request(SendNotificationRequest {
            channel: NotificationChannel::Email,
            recipient: NotificationRecipient {
                email: email.map(Into::into),
            },
            template_id: "t".into(),
            template_data: HashMap::new(),
        })
    }

    fn content() -> RenderedContent {
        RenderedContent {
            subject: Some("Appointment Confirmation".into()),
            body: "plain".into(),
            html_body: Some("<p>html</p>".into()),
        }
    }

    #[test]
    fn test_rejects_invalid_sender() {
        let mut cfg = config();
        cfg.from = "not an address".into();
        assert!(matches!(
            EmailAdapter::new(&cfg),
            Err(NotificationError::InvalidConfig(_))
        ));
    }

    fn sender() -> Mailbox {
        config().from.parse().unwrap()
    }

    #[test]
    fn test_builds_multipart_message() {
        let message =
            build_message(&sender(), &notification(Some("ada@example.com")), &content()).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();
        assert!(raw.contains("Subject: Appointment Confirmation"));
        assert!(raw.contains("To: ada@example.com"));
        assert!(raw.contains("multipart/alternative"));
    }

    #[test]
    fn test_missing_recipient() {
        let err = build_message(&sender(), &notification(None), &content()).unwrap_err();
        assert!(matches!(err, NotificationError::RecipientNotFound));
    }
}
