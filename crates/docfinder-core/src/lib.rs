pub mod appointment;
pub mod doctor;
pub mod error;
pub mod id;
pub mod time;
pub mod validation;

pub use appointment::{Appointment, AppointmentRequest, NewAppointment, SlotKey};
pub use doctor::{Doctor, DoctorField, DoctorRequest};
pub use error::{CoreError, Result};
pub use id::generate_id;
pub use time::{Timestamp, now_utc};
pub use validation::{FieldErrors, NON_FIELD_ERRORS, is_email_shaped, is_international_phone};
