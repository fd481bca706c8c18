//! # Error Types
//!
//! Domain-specific error types for downtown-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  downtown-core errors (this file)                                      │
//! │  ├── CoreError        - Pricing, record and state machine failures     │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  downtown-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  downtown-reports errors (in app)                                      │
//! │  └── ReportError      - What the caller sees (serialized)              │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → ReportError → stdout / exit code  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Failure Policy
//! - Single-record allocation fails fast with [`CoreError::MalformedRecord`].
//! - Aggregate folds skip malformed records and keep going; they never
//!   return an error for bad input data.

use thiserror::Error;

use crate::types::InvoiceStatus;

// =============================================================================
// Core Error
// =============================================================================

/// Core business logic errors.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Required configuration has not been stored yet.
    ///
    /// ## When This Occurs
    /// - A labour record is created before any price settings were saved
    /// - The per-type wage report runs with no price settings
    ///
    /// Upstream this is reported as a not-found condition.
    #[error("{0} not found")]
    ConfigurationMissing(String),

    /// A record is internally inconsistent and cannot be processed.
    ///
    /// ## When This Occurs
    /// - Negative or non-finite kg on a labour record
    /// - A staff entry without any identifier
    /// - A date that is not `YYYY-MM-DD`
    #[error("Malformed record {record_id}: {reason}")]
    MalformedRecord { record_id: String, reason: String },

    /// Invoice status change that the state machine does not allow.
    ///
    /// ## User Workflow
    /// ```text
    /// Invoice (completed)
    ///      │
    ///      ▼
    /// update_status(in progress)
    ///      │
    ///      ▼
    /// InvalidStatusTransition { from: completed, to: in progress }
    /// ```
    #[error("Invoice {invoice_id} cannot move from {from} to {to}")]
    InvalidStatusTransition {
        invoice_id: String,
        from: InvoiceStatus,
        to: InvoiceStatus,
    },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

impl CoreError {
    /// Shorthand for the missing price settings case.
    pub fn prices_missing() -> Self {
        CoreError::ConfigurationMissing("Labour prices".to_string())
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// Raised at the ingestion boundary, before a record reaches storage.
#[derive(Debug, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must not be negative (kg, amounts, rates).
    #[error("{field} must not be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid date, invalid UUID).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configuration_missing_message() {
        let err = CoreError::prices_missing();
        assert_eq!(err.to_string(), "Labour prices not found");
    }

    #[test]
    fn test_malformed_record_message() {
        let err = CoreError::MalformedRecord {
            record_id: "lab-1".to_string(),
            reason: "kg must not be negative".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "Malformed record lab-1: kg must not be negative"
        );
    }

    #[test]
    fn test_invalid_transition_message() {
        let err = CoreError::InvalidStatusTransition {
            invoice_id: "inv-9".to_string(),
            from: InvoiceStatus::Completed,
            to: InvoiceStatus::InProgress,
        };
        assert_eq!(
            err.to_string(),
            "Invoice inv-9 cannot move from completed to in progress"
        );
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "date".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
