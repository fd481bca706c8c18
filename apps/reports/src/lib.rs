//! # Downtown Reports
//!
//! Wage and statistics reports over the back-office database.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  args ──► cli::parse_args ──► ReportsConfig::load ──► Database::new    │
//! │                                                            │            │
//! │                                                            ▼            │
//! │                    stdout ◄── JSON ◄── cli::run ──► services::*        │
//! │                                           │                             │
//! │                                           ▼ (error)                     │
//! │                    stderr ◄── {"code", "message"}, exit 1              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod services;

pub use cli::{parse_args, run, Command, Invocation};
pub use config::{ConfigError, ReportsConfig};
pub use error::{ErrorCode, ReportError, ReportResult};
