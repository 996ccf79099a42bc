//! Errors raised by record store backends.

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// The requested record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    /// A record with the same primary key already exists.
    #[error("{entity} already exists: {id}")]
    AlreadyExists { entity: &'static str, id: String },

    /// A uniqueness constraint other than the primary key was violated.
    #[error("Unique constraint '{constraint}' violated: {message}")]
    UniqueViolation {
        constraint: &'static str,
        message: String,
    },

    /// A write referenced a record that does not exist.
    #[error("Foreign key violation: {message}")]
    ForeignKeyViolation { message: String },
}

impl StorageError {
    #[must_use]
    pub fn not_found(entity: &'static str, id: impl Into<String>) -> Self {
        Self::NotFound {
            entity,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn already_exists(entity: &'static str, id: impl Into<String>) -> Self {
        Self::AlreadyExists {
            entity,
            id: id.into(),
        }
    }

    #[must_use]
    pub fn unique_violation(constraint: &'static str, message: impl Into<String>) -> Self {
        Self::UniqueViolation {
            constraint,
            message: message.into(),
        }
    }

    #[must_use]
    pub fn foreign_key(message: impl Into<String>) -> Self {
        Self::ForeignKeyViolation {
            message: message.into(),
        }
    }
}
