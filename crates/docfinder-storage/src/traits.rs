//! The record store contract.

use async_trait::async_trait;
use docfinder_core::{Appointment, Doctor, DoctorField, NewAppointment};

use crate::error::StorageError;
use crate::types::{DoctorPage, DoctorQuery, UpsertOutcome};

/// Storage for doctors and their appointments.
///
/// Implementations must be thread-safe (`Send + Sync`) and must enforce the
/// appointment slot uniqueness atomically: of two concurrent bookings for the
/// same (doctor, date, time) exactly one may succeed.
#[async_trait]
pub trait RecordStore: Send + Sync {
    // ==================== Doctors ====================

    /// Inserts a new doctor.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::AlreadyExists` if the practitioner_id is taken.
    async fn create_doctor(&self, doctor: Doctor) -> Result<Doctor, StorageError>;

    /// Inserts or replaces a doctor keyed by practitioner_id.
    async fn upsert_doctor(&self, doctor: Doctor) -> Result<UpsertOutcome, StorageError>;

    /// Exact lookup by practitioner_id. Returns `None` when absent.
    async fn get_doctor(&self, practitioner_id: &str) -> Result<Option<Doctor>, StorageError>;

    /// Filters, orders and slices the doctor collection.
    async fn search_doctors(&self, query: &DoctorQuery) -> Result<DoctorPage, StorageError>;

    /// Deletes a doctor together with all of its appointments.
    ///
    /// Returns the number of appointments removed by the cascade.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::NotFound` if the doctor does not exist.
    async fn delete_doctor(&self, practitioner_id: &str) -> Result<usize, StorageError>;

    /// Distinct non-blank values of a column, sorted, at most `limit` entries.
    async fn distinct_values(
        &self,
        field: DoctorField,
        limit: usize,
    ) -> Result<Vec<String>, StorageError>;

    // ==================== Appointments ====================

    /// Persists a validated booking.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::ForeignKeyViolation` if the doctor does not exist
    /// and `StorageError::UniqueViolation` if the slot is already booked.
    async fn create_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StorageError>;

    /// Appointments ordered by (date, time), optionally for one doctor.
    async fn list_appointments(
        &self,
        doctor: Option<&str>,
    ) -> Result<Vec<Appointment>, StorageError>;

    // ==================== Metadata ====================

    /// Returns the name of this storage backend for logging/debugging.
    fn backend_name(&self) -> &'static str;
}
