//! Data-access error types.

use sea_orm::{DbErr, SqlErr};
use thiserror::Error;
use userlog_core::{SchemaError, ValidationErrors};

/// Result type alias using `DataError`.
pub type DataResult<T> = Result<T, DataError>;

/// Errors surfaced by repositories, schema sync and the transaction coordinator.
#[derive(Debug, Error)]
pub enum DataError {
    /// One or more field rules failed; nothing was written.
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationErrors),

    /// Storage rejected a duplicate value in a unique column.
    #[error("Unique constraint violated: {0}")]
    UniqueConstraint(String),

    /// Storage could not be reached.
    #[error("Connection error: {0}")]
    Connection(String),

    /// A transactional unit failed and was rolled back.
    #[error("Transaction rolled back: {0}")]
    TransactionAborted(Box<DataError>),

    /// The row to update no longer exists.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Entity declarations are inconsistent.
    #[error("Schema error: {0}")]
    Schema(#[from] SchemaError),

    /// Any other database failure.
    #[error("Database error: {0}")]
    Database(DbErr),
}

impl DataError {
    /// Returns the error code for logs and reports.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::UniqueConstraint(_) => "UNIQUE_CONSTRAINT",
            Self::Connection(_) => "CONNECTION_ERROR",
            Self::TransactionAborted(_) => "TRANSACTION_ABORTED",
            Self::NotFound(_) => "NOT_FOUND",
            Self::Schema(_) => "SCHEMA_ERROR",
            Self::Database(_) => "DATABASE_ERROR",
        }
    }

    /// Returns `true` if the caller may retry, possibly with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self.root_cause(), Self::Connection(_))
    }

    /// The innermost error, looking through rolled-back units.
    #[must_use]
    pub fn root_cause(&self) -> &Self {
        match self {
            Self::TransactionAborted(inner) => inner.root_cause(),
            other => other,
        }
    }
}

impl From<DbErr> for DataError {
    fn from(err: DbErr) -> Self {
        if let Some(SqlErr::UniqueConstraintViolation(detail)) = err.sql_err() {
            return Self::UniqueConstraint(detail);
        }

        match err {
            DbErr::Conn(e) => Self::Connection(e.to_string()),
            DbErr::ConnectionAcquire(e) => Self::Connection(e.to_string()),
            DbErr::RecordNotFound(what) => Self::NotFound(what),
            DbErr::RecordNotUpdated => Self::NotFound("row to update does not exist".to_string()),
            other => Self::Database(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ConnAcquireErr;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            DataError::Validation(ValidationErrors::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            DataError::UniqueConstraint(String::new()).error_code(),
            "UNIQUE_CONSTRAINT"
        );
        assert_eq!(
            DataError::Connection(String::new()).error_code(),
            "CONNECTION_ERROR"
        );
        assert_eq!(
            DataError::TransactionAborted(Box::new(DataError::NotFound(String::new())))
                .error_code(),
            "TRANSACTION_ABORTED"
        );
        assert_eq!(
            DataError::Schema(SchemaError::PrimaryKey("User")).error_code(),
            "SCHEMA_ERROR"
        );
    }

    #[test]
    fn test_db_err_classification() {
        assert!(matches!(
            DataError::from(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)),
            DataError::Connection(_)
        ));
        assert!(matches!(
            DataError::from(DbErr::RecordNotUpdated),
            DataError::NotFound(_)
        ));
        assert!(matches!(
            DataError::from(DbErr::Custom("boom".to_string())),
            DataError::Database(_)
        ));
    }

    #[test]
    fn test_retryable_looks_through_aborted_units() {
        let aborted =
            DataError::TransactionAborted(Box::new(DataError::Connection("gone".to_string())));
        assert!(aborted.is_retryable());
        assert!(matches!(aborted.root_cause(), DataError::Connection(_)));

        assert!(!DataError::UniqueConstraint("email".to_string()).is_retryable());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            DataError::NotFound("user 9".to_string()).to_string(),
            "Not found: user 9"
        );
        assert_eq!(
            DataError::TransactionAborted(Box::new(DataError::UniqueConstraint(
                "email".to_string()
            )))
            .to_string(),
            "Transaction rolled back: Unique constraint violated: email"
        );
    }
}
