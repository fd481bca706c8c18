//! # Report Services
//!
//! Each service fetches what one report needs from storage, hands the
//! snapshot to the pure folds in `downtown-core`, and maps errors into
//! [`crate::error::ReportError`].
//!
//! ```text
//! ┌────────────────┐   ┌────────────────┐   ┌────────────────┐   ┌──────────────┐
//! │  WageService   │   │  StatsService  │   │ LabourService  │   │ PriceService │
//! │                │   │                │   │                │   │              │
//! │ • by type      │   │ • totals       │   │ • create       │   │ • get        │
//! │ • monthly      │   │ • monthly x3   │   │ • this month   │   │ • put        │
//! │                │   │ • processes    │   │ • delete       │   │              │
//! │                │   │ • recyclers    │   │                │   │              │
//! │                │   │ • top N        │   │                │   │              │
//! └────────────────┘   └────────────────┘   └────────────────┘   └──────────────┘
//! ```
//!
//! Anything that depends on "now" takes `today` as an argument.

pub mod labour_service;
pub mod price_service;
pub mod stats_service;
pub mod wage_service;

pub use labour_service::{LabourListing, LabourService};
pub use price_service::PriceService;
pub use stats_service::StatsService;
pub use wage_service::WageService;

#[cfg(test)]
pub(crate) mod fixtures {
    use downtown_core::{
        Amount, CompanyPrices, Customer, InvoiceStatus, LabourPrices, NewInvoice, PriceTable,
        ProcessCode, Staff,
    };
    use downtown_db::{Database, DbConfig};

    pub async fn database() -> Database {
        crate::logging::init_for_tests();
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    pub fn prices() -> PriceTable {
        PriceTable {
            company_prices: CompanyPrices {
                recycling_kg: 250.0,
                blending_kg: 180.0,
                crushing_kg: 120.0,
            },
            labour_prices: LabourPrices {
                recycling: 100.0,
                blending: 50.0,
                crushing_waste: 20.0,
                crushing_sack: 10.0,
            },
        }
    }

    pub fn staff(id: &str, name: &str) -> Staff {
        Staff {
            id: id.to_string(),
            staff_id: None,
            name: name.to_string(),
            phone: String::new(),
            date_added: "2025-01-01".to_string(),
        }
    }

    pub fn customer(name: &str) -> Customer {
        Customer {
            id: Some(format!("c-{name}")),
            customer_id: None,
            name: name.to_string(),
            contact: String::new(),
            address: String::new(),
        }
    }

    /// Stores an invoice and moves it to `status`.
    #[allow(clippy::too_many_arguments)]
    pub async fn invoice(
        db: &Database,
        customer_name: &str,
        date: &str,
        process: &[ProcessCode],
        kg_in: f64,
        amount: f64,
        recycler: Option<&str>,
        status: InvoiceStatus,
    ) {
        let created = db
            .invoices()
            .create(NewInvoice {
                customer: customer(customer_name),
                product_type: "pp".to_string(),
                process_type: process.to_vec(),
                kg_in,
                kg_out: kg_in,
                amount: Amount::new(amount),
                recycler: recycler.map(str::to_string),
                date: date.to_string(),
            })
            .await
            .unwrap();
        if status != InvoiceStatus::InProgress {
            db.invoices().update_status(&created.id, status).await.unwrap();
        }
    }
}
