//! FHIR Practitioner representation of directory doctors.
//!
//! ```ignore
//! use docfinder_fhir::{FallbackHints, PractitionerOutcome, resolve};
//!
//! match resolve(&doctor, &FallbackHints::default()) {
//!     PractitionerOutcome::Converted(practitioner) => { /* full resource */ }
//!     PractitionerOutcome::Sanitized(fallback) => { /* minimal resource + _note */ }
//! }
//! ```

pub mod convert;
pub mod error;
pub mod fallback;
pub mod pipeline;
pub mod practitioner;
pub mod schema;

pub use convert::{build_practitioner, convert, validate};
pub use error::{ConversionError, FieldViolation, SchemaError, ValidationError};
pub use fallback::{FallbackHints, SanitizedPractitioner, sanitize};
pub use pipeline::{PractitionerOutcome, resolve, resolve_with};
pub use practitioner::Practitioner;
pub use schema::check_practitioner;
