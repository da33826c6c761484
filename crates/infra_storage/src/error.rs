//! Storage error types
//!
//! Adapters return `StorageError`; the hybrid store converts it into a
//! [`PortError`] at the port boundary.

use std::path::PathBuf;

use thiserror::Error;

use core_kernel::PortError;

/// Errors that can occur in the document or metadata stores
#[derive(Debug, Error)]
pub enum StorageError {
    /// Failed to establish a database connection
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Record not found
    #[error("Entity not found: {0}")]
    NotFound(String),

    /// Check constraint violation
    #[error("Constraint violation: {0}")]
    ConstraintViolation(String),

    /// Migration failed
    #[error("Migration failed: {0}")]
    MigrationFailed(String),

    /// Connection pool exhausted
    #[error("Connection pool exhausted")]
    PoolExhausted,

    /// Filesystem error in the document store
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Document key escapes the store root or is empty
    #[error("Invalid document key: {0}")]
    InvalidKey(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    SerializationError(String),

    /// Stored value cannot be mapped back to the domain
    #[error("Corrupt record: {0}")]
    CorruptRecord(String),
}

impl StorageError {
    pub fn not_found(entity: &str, id: impl std::fmt::Display) -> Self {
        StorageError::NotFound(format!("{} with id '{}' not found", entity, id))
    }

    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        StorageError::Io {
            path: path.into(),
            source,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::NotFound(_))
    }
}

/// Maps SQLx errors onto specific variants by PostgreSQL error code
impl From<sqlx::Error> for StorageError {
    fn from(error: sqlx::Error) -> Self {
        match &error {
            sqlx::Error::RowNotFound => StorageError::NotFound("Record not found".to_string()),
            sqlx::Error::PoolTimedOut => StorageError::PoolExhausted,
            sqlx::Error::Io(_) | sqlx::Error::Tls(_) => {
                StorageError::ConnectionFailed(error.to_string())
            }
            sqlx::Error::Database(db_err) => match db_err.code().as_deref() {
                // https://www.postgresql.org/docs/current/errcodes-appendix.html
                Some("23514") => StorageError::ConstraintViolation(db_err.message().to_string()),
                _ => StorageError::QueryFailed(db_err.message().to_string()),
            },
            _ => StorageError::QueryFailed(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for StorageError {
    fn from(error: sqlx::migrate::MigrateError) -> Self {
        StorageError::MigrationFailed(error.to_string())
    }
}

impl From<serde_json::Error> for StorageError {
    fn from(error: serde_json::Error) -> Self {
        StorageError::SerializationError(error.to_string())
    }
}

impl From<StorageError> for PortError {
    fn from(error: StorageError) -> Self {
        match error {
            StorageError::NotFound(msg) => PortError::NotFound {
                entity_type: "Record".to_string(),
                id: msg,
            },
            StorageError::ConnectionFailed(msg) => PortError::connection(msg),
            StorageError::PoolExhausted => PortError::ServiceUnavailable {
                service: "metadata database".to_string(),
            },
            StorageError::ConstraintViolation(msg) | StorageError::InvalidKey(msg) => {
                PortError::validation(msg)
            }
            StorageError::SerializationError(msg) => PortError::serialization(msg),
            other => PortError::internal(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_message() {
        let error = StorageError::not_found("Claim", "CLAIM_20250826_001");
        assert!(error.is_not_found());
        assert!(error.to_string().contains("CLAIM_20250826_001"));
    }

    #[test]
    fn test_port_error_mapping() {
        let port: PortError = StorageError::PoolExhausted.into();
        assert!(matches!(port, PortError::ServiceUnavailable { .. }));

        let port: PortError = StorageError::InvalidKey("../x".to_string()).into();
        assert!(matches!(port, PortError::Validation { .. }));
    }

    #[test]
    fn test_row_not_found_maps() {
        let error: StorageError = sqlx::Error::RowNotFound.into();
        assert!(error.is_not_found());
    }
}
