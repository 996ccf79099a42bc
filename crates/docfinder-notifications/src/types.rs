use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use time::OffsetDateTime;
use uuid::Uuid;

use crate::templates::APPOINTMENT_CONFIRMATION;

/// Notification channel type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationChannel {
    Email,
}

/// Notification recipient
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationRecipient {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

impl NotificationRecipient {
    pub fn email(address: impl Into<String>) -> Self {
        Self {
            email: Some(address.into()),
        }
    }
}

/// Request to send notification
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SendNotificationRequest {
    pub channel: NotificationChannel,
    pub recipient: NotificationRecipient,
    pub template_id: String,
    pub template_data: HashMap<String, serde_json::Value>,
}

/// A queued notification
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: Uuid,
    pub channel: NotificationChannel,
    pub recipient: NotificationRecipient,
    pub template_id: String,
    pub template_data: HashMap<String, serde_json::Value>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
}

impl Notification {
    pub fn from_request(request: SendNotificationRequest) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: request.channel,
            recipient: request.recipient,
            template_id: request.template_id,
            template_data: request.template_data,
            created_at: OffsetDateTime::now_utc(),
        }
    }
}

/// The job handed off after an appointment is booked. Every value is a
/// plain string so the job can cross any queue boundary unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentConfirmation {
    pub patient_email: String,
    pub doctor_name: String,
    /// `YYYY-MM-DD`
    pub appointment_date: String,
    /// `HH:MM:SS`
    pub appointment_time: String,
    pub appointment_id: String,
}

impl AppointmentConfirmation {
    pub fn into_request(self) -> SendNotificationRequest {
        let template_data: HashMap<String, serde_json::Value> = HashMap::from([
            ("doctor_name".to_string(), self.doctor_name.into()),
            ("appointment_date".to_string(), self.appointment_date.into()),
            ("appointment_time".to_string(), self.appointment_time.into()),
            ("appointment_id".to_string(), self.appointment_id.into()),
        ]);

        SendNotificationRequest {
            channel: NotificationChannel::Email,
            recipient: NotificationRecipient::email(self.patient_email),
            template_id: APPOINTMENT_CONFIRMATION.to_string(),
            template_data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_confirmation_into_request() {
        let request = AppointmentConfirmation {
            patient_email: "ada@example.com".into(),
            doctor_name: "Jane Smith".into(),
            appointment_date: "2025-03-10".into(),
            appointment_time: "09:30:00".into(),
            appointment_id: "b1946ac9-2491-4f3a-9a48-6f1e2c3d4e5f".into(),
        }
        .into_request();

        assert_eq!(request.channel, NotificationChannel::Email);
        assert_eq!(request.recipient.email.as_deref(), Some("ada@example.com"));
        assert_eq!(request.template_id, APPOINTMENT_CONFIRMATION);
        assert_eq!(request.template_data["appointment_time"], "09:30:00");
        assert_eq!(request.template_data.len(), 4);
    }

    #[test]
    fn test_notification_serializes_channel_lowercase() {
        let notification = Notification::from_request(SendNotificationRequest {
            channel: NotificationChannel::Email,
            recipient: NotificationRecipient::email("a@b.co"),
            template_id: "t".into(),
            template_data: HashMap::new(),
        });
        let json = serde_json::to_value(&notification).unwrap();
        assert_eq!(json["channel"], "email");
        assert_eq!(json["recipient"]["email"], "a@b.co");
    }
}
