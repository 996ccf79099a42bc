use thiserror::Error;

/// Core error types for DocFinder domain operations
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("Invalid date: {0}")]
    InvalidDate(String),

    #[error("Invalid time: {0}")]
    InvalidTime(String),

    #[error("Unknown doctor field: {0}")]
    UnknownField(String),
}

impl CoreError {
    /// Create a new InvalidDate error
    pub fn invalid_date(value: impl Into<String>) -> Self {
        Self::InvalidDate(value.into())
    }

    /// Create a new InvalidTime error
    pub fn invalid_time(value: impl Into<String>) -> Self {
        Self::InvalidTime(value.into())
    }

    /// Create a new UnknownField error
    pub fn unknown_field(field: impl Into<String>) -> Self {
        Self::UnknownField(field.into())
    }
}

/// Convenience result type for core operations
pub type Result<T> = std::result::Result<T, CoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let err = CoreError::invalid_date("2024-13-01");
        assert_eq!(err.to_string(), "Invalid date: 2024-13-01");

        let err = CoreError::unknown_field("salary");
        assert_eq!(err.to_string(), "Unknown doctor field: salary");
    }
}
