//! Minimal Practitioner served when full conversion fails.

use docfinder_core::Doctor;
use serde::Serialize;

use crate::practitioner::{
    CodeableConcept, Coding, ContactPoint, HumanName, PRACTITIONER_ROLE_SYSTEM, Practitioner,
    Qualification,
};

/// Values the doctor record does not hold but the fallback can carry.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackHints {
    pub gender: Option<String>,
    pub specialization_code: Option<String>,
}

/// A sanitized Practitioner plus a note saying why it was sanitized.
///
/// The note is a response annotation serialized as `_note`; the resource
/// itself only uses Practitioner elements and never carries `specialty`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SanitizedPractitioner {
    #[serde(flatten)]
    pub resource: Practitioner,
    #[serde(rename = "_note")]
    pub note: String,
}

/// Builds the fallback resource. Never fails.
pub fn sanitize(
    doctor: &Doctor,
    hints: &FallbackHints,
    failure: &dyn std::fmt::Display,
) -> SanitizedPractitioner {
    let mut resource = Practitioner::new(&doctor.practitioner_id);

    // `given` always holds one entry, "" when the first name is unknown.
    resource.name.push(HumanName {
        use_: None,
        family: Some(doctor.last_name.clone()),
        given: vec![doctor.first_name.clone()],
    });

    if !doctor.phone.is_empty() {
        resource.telecom.push(ContactPoint::phone(&doctor.phone));
    }
    if !doctor.email.is_empty() {
        resource.telecom.push(ContactPoint::email(&doctor.email));
    }

    resource.gender = hints.gender.clone().filter(|g| !g.is_empty());

    if !doctor.specialization.is_empty() {
        let code = hints
            .specialization_code
            .clone()
            .filter(|c| !c.is_empty())
            .unwrap_or_else(|| role_code(&doctor.specialization));
        resource.qualification.push(Qualification {
            code: CodeableConcept {
                coding: vec![Coding {
                    system: PRACTITIONER_ROLE_SYSTEM.to_string(),
                    code: Some(code),
                    display: Some(doctor.specialization.clone()),
                }],
            },
        });
    }

    SanitizedPractitioner {
        resource,
        note: format!(
            "Returned sanitized Practitioner without 'specialty'; original conversion failed: {failure}"
        ),
    }
}

/// `Internal Medicine` -> `INTERNAL_MEDICINE`
fn role_code(specialization: &str) -> String {
    specialization.to_uppercase().replace(' ', "_")
}
