//! Two-stage detail pipeline: convert, and sanitize on failure.

use docfinder_core::Doctor;
use serde::Serialize;

use crate::convert::convert;
use crate::error::ConversionError;
use crate::fallback::{FallbackHints, SanitizedPractitioner, sanitize};
use crate::practitioner::Practitioner;

/// What a detail request produced. Both variants are served with 200.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum PractitionerOutcome {
    Converted(Practitioner),
    Sanitized(SanitizedPractitioner),
}

impl PractitionerOutcome {
    pub fn label(&self) -> &'static str {
        match self {
            PractitionerOutcome::Converted(_) => "converted",
            PractitionerOutcome::Sanitized(_) => "sanitized",
        }
    }

    pub fn is_sanitized(&self) -> bool {
        matches!(self, PractitionerOutcome::Sanitized(_))
    }
}

/// Runs the standard converter, falling back to the sanitized resource.
pub fn resolve(doctor: &Doctor, hints: &FallbackHints) -> PractitionerOutcome {
    resolve_with(doctor, hints, convert)
}

/// Same as [`resolve`] with a caller-supplied first stage.
pub fn resolve_with<F>(doctor: &Doctor, hints: &FallbackHints, converter: F) -> PractitionerOutcome
where
    F: FnOnce(&Doctor) -> Result<Practitioner, ConversionError>,
{
    match converter(doctor) {
        Ok(practitioner) => PractitionerOutcome::Converted(practitioner),
        Err(err) => {
            tracing::info!(
                practitioner_id = %doctor.practitioner_id,
                kind = err.kind(),
                error = %err,
                "serving sanitized practitioner"
            );
            PractitionerOutcome::Sanitized(sanitize(doctor, hints, &err))
        }
    }
}
