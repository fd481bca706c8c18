//! # Repository Module
//!
//! One repository per back-office collection.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Service (reports app)                                                 │
//! │       │                                                                 │
//! │       │  db.labour().list_between("2025-03-01", "2025-03-31")          │
//! │       ▼                                                                 │
//! │  LabourRepository                                                      │
//! │  ├── insert(&self, record)                                             │
//! │  ├── list_between(&self, start, end)                                   │
//! │  ├── list_page_between(&self, start, end, page)                        │
//! │  └── delete(&self, id)                                                 │
//! │       │                                                                 │
//! │       │  SQL + JSON snapshot columns                                    │
//! │       ▼                                                                 │
//! │  SQLite Database                                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`prices::PriceRepository`] - The singleton price settings
//! - [`staff::StaffRepository`] - Staff roster
//! - [`customer::CustomerRepository`] - Customers
//! - [`labour::LabourRepository`] - Labour records
//! - [`invoice::InvoiceRepository`] - Processing invoices and their status
//! - [`sale::SaleRepository`] - Direct sales
//! - [`purchase::PurchaseRepository`] - Purchases
//! - [`expense::ExpenseRepository`] - Expenses

pub mod customer;
pub mod expense;
pub mod invoice;
pub mod labour;
pub mod prices;
pub mod purchase;
pub mod sale;
pub mod staff;

use chrono::Utc;
use serde::{de::DeserializeOwned, Serialize};

use crate::error::DbResult;

/// Encodes an embedded snapshot for a JSON TEXT column.
pub(crate) fn to_json<T: Serialize>(value: &T) -> DbResult<String> {
    Ok(serde_json::to_string(value)?)
}

/// Decodes a JSON TEXT column.
pub(crate) fn from_json<T: DeserializeOwned>(raw: &str) -> DbResult<T> {
    Ok(serde_json::from_str(raw)?)
}

/// Timestamp for `created_at` / `updated_at` columns.
pub(crate) fn now_timestamp() -> String {
    Utc::now().to_rfc3339()
}
