//! # Report Error Type
//!
//! Unified error type for report commands.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service method                                                        │
//! │  Result<T, ReportError>                                                │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  Database error?   ─── DbError::QueryFailed("...") ──────┐             │
//! │         │                                                 │             │
//! │         ▼                                                 ▼             │
//! │  Business error?   ─── CoreError::ConfigurationMissing ── ReportError  │
//! │         │                                                 │             │
//! │         ▼                                                 ▼             │
//! │  Success ───────────────────────────────► stdout    stderr (JSON)      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A failed command prints:
//! ```json
//! { "code": "NOT_FOUND", "message": "Labour prices not found" }
//! ```

use serde::Serialize;

use downtown_core::{CoreError, ValidationError};
use downtown_db::DbError;

use crate::config::ConfigError;

/// Error returned from report commands.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportError {
    /// Machine-readable error code
    pub code: ErrorCode,

    /// Human-readable error message
    pub message: String,
}

/// Error codes for report responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Resource or configuration not found (404)
    NotFound,

    /// Input validation failed (400)
    ValidationError,

    /// Duplicate key (409)
    Conflict,

    /// Database operation failed (500)
    DatabaseError,

    /// Business rule rejected the request (422)
    BusinessLogic,

    /// Configuration could not be loaded
    ConfigError,

    /// Internal error (500)
    Internal,
}

pub type ReportResult<T> = Result<T, ReportError>;

impl ReportError {
    /// Creates a new report error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ReportError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ReportError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ReportError::new(ErrorCode::ValidationError, message)
    }

    /// Creates an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        ReportError::new(ErrorCode::Internal, message)
    }
}

impl From<DbError> for ReportError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => ReportError::not_found(&entity, &id),
            DbError::UniqueViolation { field, value } => ReportError::new(
                ErrorCode::Conflict,
                format!("{} '{}' already exists", field, value),
            ),
            DbError::ConstraintViolation(e) => {
                tracing::error!("Constraint violation: {}", e);
                ReportError::validation("Record violates a storage constraint")
            }
            DbError::ConnectionFailed(_) => {
                ReportError::new(ErrorCode::DatabaseError, "Database connection failed")
            }
            DbError::MigrationFailed(_) => {
                ReportError::new(ErrorCode::DatabaseError, "Database migration failed")
            }
            DbError::QueryFailed(e) => {
                tracing::error!("Database query failed: {}", e);
                ReportError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
            DbError::TransactionFailed(e) => {
                tracing::error!("Transaction failed: {}", e);
                ReportError::new(ErrorCode::DatabaseError, "Database transaction failed")
            }
            DbError::Serialization(e) => {
                tracing::error!("Stored record could not be decoded: {}", e);
                ReportError::new(ErrorCode::DatabaseError, "Stored record is corrupt")
            }
            DbError::PoolExhausted => {
                ReportError::new(ErrorCode::DatabaseError, "Database pool exhausted")
            }
            DbError::Rejected(core) => core.into(),
            DbError::Internal(e) => {
                tracing::error!("Internal database error: {}", e);
                ReportError::new(ErrorCode::DatabaseError, "Database operation failed")
            }
        }
    }
}

impl From<CoreError> for ReportError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ConfigurationMissing(_) => {
                ReportError::new(ErrorCode::NotFound, err.to_string())
            }
            CoreError::MalformedRecord { .. } => ReportError::validation(err.to_string()),
            CoreError::InvalidStatusTransition { .. } => {
                ReportError::new(ErrorCode::BusinessLogic, err.to_string())
            }
            CoreError::Validation(e) => e.into(),
        }
    }
}

impl From<ValidationError> for ReportError {
    fn from(err: ValidationError) -> Self {
        ReportError::validation(err.to_string())
    }
}

impl From<ConfigError> for ReportError {
    fn from(err: ConfigError) -> Self {
        ReportError::new(ErrorCode::ConfigError, err.to_string())
    }
}

impl std::fmt::Display for ReportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ReportError {}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use downtown_core::InvoiceStatus;

    #[test]
    fn test_missing_prices_is_not_found() {
        let err: ReportError = CoreError::prices_missing().into();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Labour prices not found");
    }

    #[test]
    fn test_rejected_transition_passes_through_db_error() {
        let core = CoreError::InvalidStatusTransition {
            invoice_id: "inv-1".to_string(),
            from: InvoiceStatus::Completed,
            to: InvoiceStatus::Stopped,
        };
        let err: ReportError = DbError::Rejected(core).into();
        assert_eq!(err.code, ErrorCode::BusinessLogic);
        assert!(err.message.contains("inv-1"));
    }

    #[test]
    fn test_serialized_shape() {
        let err = ReportError::not_found("Invoice", "inv-9");
        let json = serde_json::to_value(&err).unwrap();
        assert_eq!(json["code"], "NOT_FOUND");
        assert_eq!(json["message"], "Invoice not found: inv-9");
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let err: ReportError = DbError::QueryFailed("near \"SELEC\": syntax error".into()).into();
        assert_eq!(err.code, ErrorCode::DatabaseError);
        assert_eq!(err.message, "Database operation failed");
    }
}
