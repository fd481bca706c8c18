//! # downtown-db: Database Layer for the Downtown Back Office
//!
//! This crate stores every back-office record in SQLite through sqlx and
//! hands read-only snapshots to the aggregation engine in `downtown-core`.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Downtown Data Flow                               │
//! │                                                                         │
//! │  downtown-reports (wage_service, stats_service, labour_service)        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                    downtown-db (THIS CRATE)                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌────────────────┐    ┌──────────────┐ │   │
//! │  │   │   Database    │    │  Repositories  │    │  Migrations  │ │   │
//! │  │   │   (pool.rs)   │    │                │    │  (embedded)  │ │   │
//! │  │   │               │    │ PriceRepo      │    │              │ │   │
//! │  │   │ SqlitePool    │◄───│ LabourRepo     │    │ 001_initial_ │ │   │
//! │  │   │ Connection    │    │ InvoiceRepo    │    │ schema.sql   │ │   │
//! │  │   │ Management    │    │ Staff/Customer │    │              │ │   │
//! │  │   └───────────────┘    │ Sale/Purchase/ │    └──────────────┘ │   │
//! │  │                        │ Expense        │                     │   │
//! │  │                        └────────────────┘                     │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                     SQLite Database                             │   │
//! │  │            <data dir>/downtown/downtown.db                      │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - One repository per collection
//!
//! ## Usage
//!
//! ```rust,ignore
//! use downtown_db::{Database, DbConfig};
//!
//! let db = Database::new(DbConfig::new("downtown.db")).await?;
//!
//! let prices = db.prices().get().await?;
//! let records = db.labour().list_all().await?;
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::customer::CustomerRepository;
pub use repository::expense::ExpenseRepository;
pub use repository::invoice::InvoiceRepository;
pub use repository::labour::LabourRepository;
pub use repository::prices::PriceRepository;
pub use repository::purchase::PurchaseRepository;
pub use repository::sale::SaleRepository;
pub use repository::staff::StaffRepository;
