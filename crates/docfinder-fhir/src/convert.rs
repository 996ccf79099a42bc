//! Doctor record to Practitioner resource.

use docfinder_core::Doctor;
use docfinder_core::doctor::MIN_PHONE_LEN;

use crate::error::{ConversionError, FieldViolation, ValidationError};
use crate::practitioner::{
    Address, CodeableConcept, Coding, ContactPoint, Extension, HumanName, Identifier,
    Practitioner, SPECIALTY_EXTENSION_URL, SPECIALTY_SYSTEM,
};
use crate::schema::check_practitioner;

/// Checks the fields a Practitioner cannot be built without.
pub fn validate(doctor: &Doctor) -> Result<(), ValidationError> {
    let mut violations = Vec::new();
    let mut require = |field: &'static str, value: &str, message: &'static str| {
        if value.trim().is_empty() {
            violations.push(FieldViolation { field, message });
        }
    };

    require("first_name", &doctor.first_name, "First name is required.");
    require("last_name", &doctor.last_name, "Last name is required.");
    require("phone", &doctor.phone, "Phone number is required.");
    require("specialization", &doctor.specialization, "Specialization is required.");
    require("address", &doctor.address, "Address is required.");

    let phone = doctor.phone.trim();
    if !phone.is_empty() && phone.chars().count() < MIN_PHONE_LEN {
        violations.push(FieldViolation {
            field: "phone",
            message: "Phone number must be at least 10 digits.",
        });
    }

    if violations.is_empty() {
        Ok(())
    } else {
        violations.sort_by_key(|v| field_rank(v.field));
        Err(ValidationError { violations })
    }
}

fn field_rank(field: &str) -> usize {
    ["first_name", "last_name", "phone", "specialization", "address"]
        .iter()
        .position(|f| *f == field)
        .unwrap_or(usize::MAX)
}

/// Maps a validated doctor onto the Practitioner structure.
pub fn build_practitioner(doctor: &Doctor) -> Practitioner {
    let mut practitioner = Practitioner::new(&doctor.practitioner_id);

    practitioner.identifier.push(Identifier {
        system: None,
        value: doctor.practitioner_id.clone(),
    });
    practitioner.name.push(HumanName {
        use_: Some("official".to_string()),
        family: Some(doctor.last_name.clone()),
        given: vec![doctor.first_name.clone()],
    });
    practitioner.telecom.push(ContactPoint::phone(&doctor.phone));
    practitioner.address.push(Address {
        line: vec![doctor.address.clone()],
        city: doctor.city.clone(),
        state: doctor.state.clone(),
        postal_code: doctor.zip_code.clone(),
    });
    practitioner.extension.push(Extension {
        url: SPECIALTY_EXTENSION_URL.to_string(),
        value_codeable_concept: Some(CodeableConcept {
            coding: vec![Coding {
                system: SPECIALTY_SYSTEM.to_string(),
                code: Some(doctor.specialization.clone()),
                display: None,
            }],
        }),
    });

    practitioner
}

/// Validates, builds and schema-checks a Practitioner for `doctor`.
pub fn convert(doctor: &Doctor) -> Result<Practitioner, ConversionError> {
    validate(doctor)?;
    let practitioner = build_practitioner(doctor);
    check_practitioner(&serde_json::to_value(&practitioner)?)?;
    Ok(practitioner)
}
