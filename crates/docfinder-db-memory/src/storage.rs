use std::collections::BTreeSet;
use std::sync::Arc;

use async_trait::async_trait;
use docfinder_core::{Appointment, Doctor, DoctorField, NewAppointment, SlotKey, generate_id, now_utc};
use docfinder_storage::{
    DoctorPage, DoctorQuery, RecordStore, StorageError, UpsertOutcome,
};
use papaya::HashMap as PapayaHashMap;
use uuid::Uuid;

use crate::query;

const DOCTOR: &str = "Doctor";
const SLOT_CONSTRAINT: &str = "appointment_slot";

/// In-memory record store using papaya lock-free HashMaps.
///
/// Appointment slots live in their own map so that a booking claims its
/// (doctor, date, time) key with a single atomic `try_insert`.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    pub(crate) doctors: Arc<PapayaHashMap<String, Doctor>>,
    pub(crate) appointments: Arc<PapayaHashMap<Uuid, Appointment>>,
    pub(crate) slots: Arc<PapayaHashMap<SlotKey, Uuid>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn doctor_count(&self) -> usize {
        self.doctors.pin().len()
    }

    pub fn appointment_count(&self) -> usize {
        self.appointments.pin().len()
    }

    fn release_slot(&self, slot: &SlotKey, appointment_id: &Uuid) {
        let slots = self.slots.pin();
        if slots.get(slot) == Some(appointment_id) {
            slots.remove(slot);
        }
    }
}

#[async_trait]
impl RecordStore for InMemoryStorage {
    async fn create_doctor(&self, doctor: Doctor) -> Result<Doctor, StorageError> {
        let guard = self.doctors.pin();
        match guard.try_insert(doctor.practitioner_id.clone(), doctor) {
            Ok(stored) => Ok(stored.clone()),
            Err(occupied) => Err(StorageError::already_exists(
                DOCTOR,
                occupied.current.practitioner_id.clone(),
            )),
        }
    }

    async fn upsert_doctor(&self, doctor: Doctor) -> Result<UpsertOutcome, StorageError> {
        let guard = self.doctors.pin();
        match guard.insert(doctor.practitioner_id.clone(), doctor) {
            Some(_) => Ok(UpsertOutcome::Updated),
            None => Ok(UpsertOutcome::Created),
        }
    }

    async fn get_doctor(&self, practitioner_id: &str) -> Result<Option<Doctor>, StorageError> {
        Ok(self.doctors.pin().get(practitioner_id).cloned())
    }

    async fn search_doctors(&self, query: &DoctorQuery) -> Result<DoctorPage, StorageError> {
        let guard = self.doctors.pin();
        Ok(query::execute(query, guard.values()))
    }

    async fn delete_doctor(&self, practitioner_id: &str) -> Result<usize, StorageError> {
        self.doctors
            .pin()
            .remove(practitioner_id)
            .ok_or_else(|| StorageError::not_found(DOCTOR, practitioner_id))?;

        let appointments = self.appointments.pin();
        let owned: Vec<(Uuid, SlotKey)> = appointments
            .iter()
            .filter(|(_, a)| a.doctor == practitioner_id)
            .map(|(id, a)| (*id, a.slot()))
            .collect();

        for (id, slot) in &owned {
            appointments.remove(id);
            self.release_slot(slot, id);
        }

        tracing::debug!(
            practitioner_id,
            cascaded = owned.len(),
            "doctor deleted"
        );
        Ok(owned.len())
    }

    async fn distinct_values(
        &self,
        field: DoctorField,
        limit: usize,
    ) -> Result<Vec<String>, StorageError> {
        let guard = self.doctors.pin();
        let values: BTreeSet<String> = guard
            .values()
            .filter_map(|d| d.field(field))
            .filter(|v| !v.trim().is_empty())
            .map(str::to_string)
            .collect();
        Ok(values.into_iter().take(limit).collect())
    }

    async fn create_appointment(
        &self,
        appointment: NewAppointment,
    ) -> Result<Appointment, StorageError> {
        if self.doctors.pin().get(&appointment.doctor).is_none() {
            return Err(StorageError::foreign_key(format!(
                "doctor '{}' does not exist",
                appointment.doctor
            )));
        }

        let appointment_id = generate_id();
        let slot = appointment.slot();

        if self
            .slots
            .pin()
            .try_insert(slot.clone(), appointment_id)
            .is_err()
        {
            return Err(StorageError::unique_violation(
                SLOT_CONSTRAINT,
                "The fields doctor, appointment_date, appointment_time must make a unique set.",
            ));
        }

        let stored = Appointment {
            appointment_id,
            doctor: appointment.doctor,
            patient_name: appointment.patient_name,
            phone_number: appointment.phone_number,
            email: appointment.email,
            reason: appointment.reason,
            appointment_date: appointment.appointment_date,
            appointment_time: appointment.appointment_time,
            created_at: now_utc(),
        };
        self.appointments.pin().insert(appointment_id, stored.clone());

        // A concurrent delete may have removed the doctor after the first check.
        if self.doctors.pin().get(&stored.doctor).is_none() {
            self.appointments.pin().remove(&appointment_id);
            self.release_slot(&slot, &appointment_id);
            return Err(StorageError::foreign_key(format!(
                "doctor '{}' does not exist",
                stored.doctor
            )));
        }

        Ok(stored)
    }

    async fn list_appointments(
        &self,
        doctor: Option<&str>,
    ) -> Result<Vec<Appointment>, StorageError> {
        let guard = self.appointments.pin();
        let mut appointments: Vec<Appointment> = guard
            .values()
            .filter(|a| doctor.is_none_or(|d| a.doctor == d))
            .cloned()
            .collect();
        appointments.sort_by(|a, b| {
            (a.appointment_date, a.appointment_time, &a.doctor, a.appointment_id).cmp(&(
                b.appointment_date,
                b.appointment_time,
                &b.doctor,
                b.appointment_id,
            ))
        });
        Ok(appointments)
    }

    fn backend_name(&self) -> &'static str {
        "memory-papaya"
    }
}
