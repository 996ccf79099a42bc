//! Appointment bookings.

use serde::{Deserialize, Serialize};
use time::{Date, Time};
use uuid::Uuid;

use crate::time::{Timestamp, parse_date, parse_time};
use crate::validation::{FieldErrors, is_email_shaped, is_international_phone};

pub const MAX_PATIENT_NAME_LEN: usize = 100;
pub const PHONE_FORMAT_MESSAGE: &str =
    "Phone number must be in international format like +11234567890.";

/// A stored appointment. Never updated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub appointment_id: Uuid,
    /// practitioner_id of the booked doctor
    pub doctor: String,
    pub patient_name: String,
    pub phone_number: String,
    pub email: String,
    pub reason: String,
    #[serde(with = "crate::time::date")]
    pub appointment_date: Date,
    #[serde(with = "crate::time::clock")]
    pub appointment_time: Time,
    pub created_at: Timestamp,
}

impl Appointment {
    pub fn slot(&self) -> SlotKey {
        SlotKey {
            doctor: self.doctor.clone(),
            date: self.appointment_date,
            time: self.appointment_time,
        }
    }
}

/// The (doctor, date, time) triple that must be unique across appointments.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotKey {
    pub doctor: String,
    pub date: Date,
    pub time: Time,
}

/// Booking payload as received from a client. All fields are optional so that
/// missing values surface as field errors instead of a deserialization failure.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppointmentRequest {
    #[serde(default)]
    pub doctor: Option<String>,
    #[serde(default)]
    pub patient_name: Option<String>,
    #[serde(default)]
    pub phone_number: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub reason: Option<String>,
    #[serde(default)]
    pub appointment_date: Option<String>,
    #[serde(default)]
    pub appointment_time: Option<String>,
}

/// A booking that passed field validation and is ready to be stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewAppointment {
    pub doctor: String,
    pub patient_name: String,
    pub phone_number: String,
    pub email: String,
    pub reason: String,
    pub appointment_date: Date,
    pub appointment_time: Time,
}

impl NewAppointment {
    pub fn slot(&self) -> SlotKey {
        SlotKey {
            doctor: self.doctor.clone(),
            date: self.appointment_date,
            time: self.appointment_time,
        }
    }
}

impl AppointmentRequest {
    /// Checks every field and returns either a typed booking or all errors.
    ///
    /// Whether the doctor exists is a store concern and is checked by the caller.
    pub fn validate(&self) -> Result<NewAppointment, FieldErrors> {
        let mut errors = FieldErrors::new();

        let doctor = required(&mut errors, "doctor", self.doctor.as_deref());
        let patient_name = required(&mut errors, "patient_name", self.patient_name.as_deref());
        if let Some(name) = &patient_name
            && name.chars().count() > MAX_PATIENT_NAME_LEN
        {
            errors.add(
                "patient_name",
                format!("Ensure this field has no more than {MAX_PATIENT_NAME_LEN} characters."),
            );
        }

        let phone_number = required(&mut errors, "phone_number", self.phone_number.as_deref());
        if let Some(phone) = &phone_number
            && !is_international_phone(phone)
        {
            errors.add("phone_number", PHONE_FORMAT_MESSAGE);
        }

        let email = required(&mut errors, "email", self.email.as_deref());
        if let Some(email) = &email
            && !is_email_shaped(email)
        {
            errors.add("email", "Enter a valid email address.");
        }

        let reason = required(&mut errors, "reason", self.reason.as_deref());

        let date = required(&mut errors, "appointment_date", self.appointment_date.as_deref())
            .and_then(|raw| match parse_date(&raw) {
                Ok(date) => Some(date),
                Err(_) => {
                    errors.add(
                        "appointment_date",
                        "Date has wrong format. Use one of these formats instead: YYYY-MM-DD.",
                    );
                    None
                }
            });

        let time = required(&mut errors, "appointment_time", self.appointment_time.as_deref())
            .and_then(|raw| match parse_time(&raw) {
                Ok(time) => Some(time),
                Err(_) => {
                    errors.add(
                        "appointment_time",
                        "Time has wrong format. Use one of these formats instead: hh:mm[:ss].",
                    );
                    None
                }
            });

        match (doctor, patient_name, phone_number, email, reason, date, time) {
            (
                Some(doctor),
                Some(patient_name),
                Some(phone_number),
                Some(email),
                Some(reason),
                Some(appointment_date),
                Some(appointment_time),
            ) if errors.is_empty() => Ok(NewAppointment {
                doctor,
                patient_name,
                phone_number,
                email: email.trim().to_string(),
                reason,
                appointment_date,
                appointment_time,
            }),
            _ => Err(errors),
        }
    }
}

fn required(errors: &mut FieldErrors, field: &str, value: Option<&str>) -> Option<String> {
    match value.map(str::trim) {
        None => {
            errors.add(field, "This field is required.");
            None
        }
        Some("") => {
            errors.add(field, "This field may not be blank.");
            None
        }
        Some(v) => Some(v.to_string()),
    }
}
