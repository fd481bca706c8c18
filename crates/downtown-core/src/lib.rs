//! # downtown-core: Pure Business Logic for the Downtown Back Office
//!
//! This crate holds the wage computation and statistics aggregation engine
//! as pure functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Downtown Back-Office Architecture                  │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 downtown-reports (CLI / services)               │   │
//! │  │     wages, monthly-wages, stats, monthly-kg, top-customers     │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ record snapshots                       │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │               ★ downtown-core (THIS CRATE) ★                    │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌────────────┐  ┌───────────┐  ┌───────────┐ │   │
//! │  │   │  pricing  │  │ allocation │  │   wages   │  │   stats   │ │   │
//! │  │   │PriceTable │  │  amount +  │  │ byType +  │  │ totals +  │ │   │
//! │  │   │LabourType │  │memberShare │  │  monthly  │  │  series   │ │   │
//! │  │   └───────────┘  └────────────┘  └───────────┘  └───────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO CLOCK • PURE FUNCTIONS             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                ▲                                        │
//! │  ┌─────────────────────────────┴───────────────────────────────────┐   │
//! │  │                  downtown-db (Database Layer)                   │   │
//! │  │              SQLite queries, migrations, repositories           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Record types (LabourRecord, InvoiceRecord, StaffRef, etc.)
//! - [`money`] - Amount type for currency values
//! - [`pricing`] - PriceTable and the LabourType classification
//! - [`allocation`] - Per-record amount and member share
//! - [`wages`] - Per-staff wage folds
//! - [`stats`] - Business statistics folds
//! - [`calendar`] - Month labels, month windows, date parsing
//! - [`validation`] - Input rules applied at the ingestion boundary
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use downtown_core::allocation::allocate;
//! use downtown_core::pricing::{LabourPrices, LabourType};
//!
//! let prices = LabourPrices {
//!     recycling: 100.0,
//!     blending: 50.0,
//!     crushing_waste: 20.0,
//!     crushing_sack: 10.0,
//! };
//!
//! let kind = LabourType::classify("labour recycling");
//! let allocation = allocate(&prices, kind, 10.0, 2);
//!
//! assert_eq!(allocation.amount.value(), 1000.0);
//! assert_eq!(allocation.member_share.value(), 500.0);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod allocation;
pub mod calendar;
pub mod error;
pub mod money;
pub mod pricing;
pub mod stats;
pub mod types;
pub mod validation;
pub mod wages;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Amount;
pub use pricing::{CompanyPrices, LabourPrices, LabourType, PriceTable};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Number of customers returned by the top customers ranking when the
/// caller does not ask for a different size.
pub const DEFAULT_TOP_CUSTOMERS: usize = 5;

/// Upper bound for a single page of records.
///
/// ## Business Reason
/// Listing endpoints in the back office never return more than 100 rows.
pub const MAX_PAGE_SIZE: u32 = 100;

/// Page size used when none is requested.
pub const DEFAULT_PAGE_SIZE: u32 = 10;
