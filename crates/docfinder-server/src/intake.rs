//! Appointment intake: validate, persist, hand off one confirmation.

use std::sync::Arc;

use docfinder_api::{ApiError, ApiResult};
use docfinder_core::time::{format_date, format_time};
use docfinder_core::{Appointment, AppointmentRequest, Doctor, FieldErrors};
use docfinder_notifications::{AppointmentConfirmation, NotificationQueue};
use docfinder_storage::{RecordStore, StorageError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::metrics;

/// Body returned for a created appointment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppointmentResponse {
    pub appointment_id: Uuid,
    pub doctor: String,
    /// The doctor's first name
    pub doctor_name: String,
    pub patient_name: String,
    pub phone_number: String,
    pub email: String,
    pub reason: String,
    pub appointment_date: String,
    pub appointment_time: String,
}

impl AppointmentResponse {
    pub fn new(appointment: &Appointment, doctor: &Doctor) -> Self {
        Self {
            appointment_id: appointment.appointment_id,
            doctor: appointment.doctor.clone(),
            doctor_name: doctor.first_name.clone(),
            patient_name: appointment.patient_name.clone(),
            phone_number: appointment.phone_number.clone(),
            email: appointment.email.clone(),
            reason: appointment.reason.clone(),
            appointment_date: format_date(appointment.appointment_date),
            appointment_time: format_time(appointment.appointment_time),
        }
    }
}

fn unknown_doctor(id: &str) -> String {
    format!("Invalid pk \"{id}\" - object does not exist.")
}

/// Books an appointment.
///
/// Every field error is reported at once, including an unknown doctor. A
/// taken slot is reported under `non_field_errors`. When `queue` is set one
/// confirmation job is enqueued on a spawned task; its outcome never reaches
/// the caller.
pub async fn book(
    store: &dyn RecordStore,
    queue: Option<Arc<dyn NotificationQueue>>,
    request: AppointmentRequest,
) -> ApiResult<AppointmentResponse> {
    let doctor_id = request
        .doctor
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let doctor = match doctor_id {
        Some(id) => store.get_doctor(id).await?,
        None => None,
    };

    let (new, doctor) = match (request.validate(), doctor) {
        (Ok(new), Some(doctor)) => (new, doctor),
        (checked, _) => {
            let mut errors = checked.err().unwrap_or_else(FieldErrors::new);
            if let Some(id) = doctor_id
                && !errors.contains("doctor")
            {
                errors.add("doctor", unknown_doctor(id));
            }
            return Err(errors.into());
        }
    };

    let appointment = match store.create_appointment(new).await {
        Ok(appointment) => appointment,
        Err(StorageError::UniqueViolation { message, .. }) => {
            metrics::record_appointment_conflict();
            tracing::info!(doctor = %doctor.practitioner_id, "appointment slot already taken");
            return Err(ApiError::non_field(message));
        }
        Err(StorageError::ForeignKeyViolation { .. }) => {
            // The doctor was deleted between the lookup and the insert.
            return Err(ApiError::field(
                "doctor",
                unknown_doctor(&doctor.practitioner_id),
            ));
        }
        Err(e) => return Err(e.into()),
    };

    metrics::record_appointment_created();
    tracing::info!(
        appointment_id = %appointment.appointment_id,
        doctor = %appointment.doctor,
        date = %format_date(appointment.appointment_date),
        time = %format_time(appointment.appointment_time),
        "appointment booked"
    );

    if let Some(queue) = queue {
        dispatch_confirmation(queue, &appointment, &doctor);
    }

    Ok(AppointmentResponse::new(&appointment, &doctor))
}

fn dispatch_confirmation(queue: Arc<dyn NotificationQueue>, appointment: &Appointment, doctor: &Doctor) {
    let job = AppointmentConfirmation {
        patient_email: appointment.email.clone(),
        doctor_name: doctor.full_name(),
        appointment_date: format_date(appointment.appointment_date),
        appointment_time: format_time(appointment.appointment_time),
        appointment_id: appointment.appointment_id.to_string(),
    };
    let appointment_id = appointment.appointment_id;

    tokio::spawn(async move {
        match queue.enqueue(job.into_request()).await {
            Ok(notification_id) => {
                metrics::record_notification_enqueued();
                tracing::debug!(%appointment_id, %notification_id, "confirmation enqueued");
            }
            Err(e) => {
                tracing::warn!(%appointment_id, error = %e, "failed to enqueue confirmation");
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use docfinder_db_memory::InMemoryStorage;
    use docfinder_notifications::ChannelQueue;

    fn doctor() -> Doctor {
        Doctor {
            first_name: "Jane".into(),
            last_name: "Smith".into(),
            specialization: "Cardiology".into(),
            phone: "5125550100".into(),
            email: "jane@example.com".into(),
            address: "1 Main St".into(),
            ..Doctor::new("1003000126")
        }
    }

    fn request() -> AppointmentRequest {
        AppointmentRequest {
            doctor: Some("1003000126".into()),
            patient_name: Some("Ada Lovelace".into()),
            phone_number: Some("+11234567890".into()),
            email: Some("ada@example.com".into()),
            reason: Some("Checkup".into()),
            appointment_date: Some("2025-03-10".into()),
            appointment_time: Some("09:30".into()),
        }
    }

    async fn store() -> InMemoryStorage {
        let store = InMemoryStorage::new();
        store.create_doctor(doctor()).await.unwrap();
        store
    }

    fn field_errors(err: ApiError) -> FieldErrors {
        match err {
            ApiError::Validation(errors) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_books_and_enqueues_one_confirmation() {
        let store = store().await;
        let (queue, mut receiver) = ChannelQueue::new();

        let resp = book(&store, Some(Arc::new(queue)), request()).await.unwrap();
        assert_eq!(resp.doctor_name, "Jane");
        assert_eq!(resp.appointment_time, "09:30:00");
        assert_eq!(resp.appointment_date, "2025-03-10");

        let job = receiver.recv().await.unwrap();
        assert_eq!(job.recipient.email.as_deref(), Some("ada@example.com"));
        assert_eq!(job.template_data["doctor_name"], "Jane Smith");
        assert_eq!(job.template_data["appointment_time"], "09:30:00");
        assert_eq!(
            job.template_data["appointment_id"],
            resp.appointment_id.to_string()
        );
    }

    #[tokio::test]
    async fn test_second_booking_for_slot_is_a_non_field_error() {
        let store = store().await;
        book(&store, None, request()).await.unwrap();

        let mut again = request();
        again.appointment_time = Some("09:30:00".into());
        let errors = field_errors(book(&store, None, again).await.unwrap_err());
        assert!(errors.contains("non_field_errors"));
    }

    #[tokio::test]
    async fn test_unknown_doctor_is_reported_with_other_errors() {
        let store = store().await;
        let mut req = request();
        req.doctor = Some("nope".into());
        req.phone_number = Some("1234567890".into());

        let errors = field_errors(book(&store, None, req).await.unwrap_err());
        assert_eq!(
            errors.get("doctor").unwrap(),
            ["Invalid pk \"nope\" - object does not exist."]
        );
        assert!(errors.contains("phone_number"));
    }

    #[tokio::test]
    async fn test_closed_queue_does_not_fail_booking() {
        let store = store().await;
        let (queue, receiver) = ChannelQueue::new();
        drop(receiver);

        assert!(book(&store, Some(Arc::new(queue)), request()).await.is_ok());
    }
}
