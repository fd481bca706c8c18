//! # Validation Module
//!
//! Input rules for records entering the back office.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: Ingestion (THIS MODULE, strict)                              │
//! │  ├── validate_date, validate_kg, validate_amount                       │
//! │  └── validate_labour_type: unknown labels are rejected here            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Database (SQLite)                                            │
//! │  ├── NOT NULL constraints                                              │
//! │  └── CHECK constraints on status / category                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Aggregation (lenient)                                        │
//! │  └── check_labour_record: bad rows are skipped, not fatal              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use downtown_core::validation::{validate_date, validate_kg};
//!
//! assert!(validate_date("date", "2025-03-14").is_ok());
//! assert!(validate_kg(12.5).is_ok());
//! assert!(validate_kg(-1.0).is_err());
//! ```

use crate::calendar;
use crate::error::{CoreError, ValidationError};
use crate::pricing::LabourType;
use crate::types::{LabourRecord, NewInvoice, NewLabourRecord, StaffIdentity};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Scalar Validators
// =============================================================================

/// Validates a `YYYY-MM-DD` record date.
pub fn validate_date(field: &str, date: &str) -> ValidationResult<()> {
    if date.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if calendar::parse_date(date).is_none() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "expected YYYY-MM-DD".to_string(),
        });
    }

    Ok(())
}

fn validate_non_negative(field: &str, value: f64) -> ValidationResult<()> {
    if !value.is_finite() {
        return Err(ValidationError::InvalidFormat {
            field: field.to_string(),
            reason: "must be a finite number".to_string(),
        });
    }
    if value < 0.0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a weight in kg.
pub fn validate_kg(kg: f64) -> ValidationResult<()> {
    validate_non_negative("kg", kg)
}

/// Validates a currency amount.
pub fn validate_amount(field: &str, amount: f64) -> ValidationResult<()> {
    validate_non_negative(field, amount)
}

/// Validates a labour label and returns its type.
///
/// Labels that classify as [`LabourType::Unknown`] are rejected so no
/// zero-paid record is ever written.
///
/// ## Example
/// ```rust
/// use downtown_core::pricing::LabourType;
/// use downtown_core::validation::validate_labour_type;
///
/// assert_eq!(validate_labour_type("labour blending").unwrap(), LabourType::Blending);
/// assert!(validate_labour_type("labour crushing").is_err());
/// ```
pub fn validate_labour_type(label: &str) -> ValidationResult<LabourType> {
    if label.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "labourType".to_string(),
        });
    }

    match LabourType::classify(label) {
        LabourType::Unknown => Err(ValidationError::NotAllowed {
            field: "labourType".to_string(),
            allowed: LabourType::known()
                .iter()
                .map(|t| t.label().to_string())
                .collect(),
        }),
        known => Ok(known),
    }
}

/// Validates a six-digit staff code.
pub fn validate_staff_code(code: u32) -> ValidationResult<()> {
    if !(100_000..=999_999).contains(&code) {
        return Err(ValidationError::OutOfRange {
            field: "staff_id".to_string(),
            min: 100_000,
            max: 999_999,
        });
    }
    Ok(())
}

/// Validates a required display name.
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.len() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

// =============================================================================
// Record Validators
// =============================================================================

/// Validates a labour record submission.
pub fn validate_new_labour_record(record: &NewLabourRecord) -> ValidationResult<LabourType> {
    if record.staffs.is_empty() {
        return Err(ValidationError::Required {
            field: "staffs".to_string(),
        });
    }
    if record.staffs.iter().any(|s| s.key().is_none()) {
        return Err(ValidationError::InvalidFormat {
            field: "staffs".to_string(),
            reason: "every staff entry needs an id".to_string(),
        });
    }

    validate_kg(record.kg)?;
    validate_date("date", &record.date)?;

    if let Some(amount) = record.amount {
        validate_amount("amount", amount.value())?;
    }
    if let Some(share) = record.member_share {
        validate_amount("memberShare", share.value())?;
    }

    validate_labour_type(&record.labour_type)
}

/// Validates an invoice submission.
pub fn validate_new_invoice(invoice: &NewInvoice) -> ValidationResult<()> {
    validate_name("customer.name", &invoice.customer.name)?;

    if invoice.product_type.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "productType".to_string(),
        });
    }
    if invoice.process_type.is_empty() {
        return Err(ValidationError::Required {
            field: "processType".to_string(),
        });
    }

    validate_non_negative("kgIn", invoice.kg_in)?;
    validate_non_negative("kgOut", invoice.kg_out)?;
    validate_amount("amount", invoice.amount.value())?;
    validate_date("date", &invoice.date)?;

    if let Some(raw) = invoice.recycler.as_deref() {
        if crate::types::Recycler::parse(raw).is_none() {
            return Err(ValidationError::NotAllowed {
                field: "recycler".to_string(),
                allowed: vec!["a".to_string(), "b".to_string()],
            });
        }
    }

    Ok(())
}

/// Checks a stored labour record is usable by the wage folds.
///
/// Returns `MalformedRecord` for a date that is not `YYYY-MM-DD`, or a
/// negative or non-finite kg, amount or member share. Folds skip such
/// records; callers use this to count and report them.
pub fn check_labour_record(record: &LabourRecord) -> Result<(), CoreError> {
    let malformed = |reason: String| CoreError::MalformedRecord {
        record_id: record.id.clone(),
        reason,
    };

    if calendar::parse_date(&record.date).is_none() {
        return Err(malformed(format!("invalid date '{}'", record.date)));
    }
    if !record.kg.is_finite() || record.kg < 0.0 {
        return Err(malformed(format!("invalid kg {}", record.kg)));
    }
    if !record.amount.value().is_finite() || !record.member_share.value().is_finite() {
        return Err(malformed("amount is not a finite number".to_string()));
    }
    if record.amount.is_negative() || record.member_share.is_negative() {
        return Err(malformed(format!(
            "negative amount {} or member share {}",
            record.amount, record.member_share
        )));
    }
    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
