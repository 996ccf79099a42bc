use std::fmt;

use thiserror::Error;

/// One rule a doctor record breaks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldViolation {
    pub field: &'static str,
    pub message: &'static str,
}

impl fmt::Display for FieldViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message)
    }
}

/// Every violation found while checking a doctor for conversion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Validation failed: {}", join(.violations))]
pub struct ValidationError {
    pub violations: Vec<FieldViolation>,
}

impl ValidationError {
    pub fn fields(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.violations.iter().map(|v| v.field)
    }
}

/// Structural problems in a serialized Practitioner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Practitioner schema violation: {}", .issues.join("; "))]
pub struct SchemaError {
    pub issues: Vec<String>,
}

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Schema(#[from] SchemaError),
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConversionError {
    pub fn kind(&self) -> &'static str {
        match self {
            ConversionError::Validation(_) => "validation",
            ConversionError::Schema(_) => "schema",
            ConversionError::Serialization(_) => "serialization",
        }
    }
}

fn join(violations: &[FieldViolation]) -> String {
    violations
        .iter()
        .map(|v| v.message)
        .collect::<Vec<_>>()
        .join(", ")
}
