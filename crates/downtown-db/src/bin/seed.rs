//! # Seed Data Generator
//!
//! Populates the database with a few months of back-office activity for
//! development and demos.
//!
//! ## Usage
//! ```bash
//! # Seed six months ending this month (default)
//! cargo run -p downtown-db --bin seed
//!
//! # Seed a full year
//! cargo run -p downtown-db --bin seed -- --months 12
//!
//! # Specify database path
//! cargo run -p downtown-db --bin seed -- --db ./data/downtown.db
//! ```
//!
//! ## Generated Data
//! - Price settings
//! - A roster of staff with six-digit codes
//! - Customers
//! - Per month: labour records on both shifts, invoices in every status,
//!   direct sales, purchases and expenses

use chrono::{Datelike, Months, NaiveDate, Utc};
use std::env;

use downtown_core::allocation::allocate_record;
use downtown_core::calendar::format_date;
use downtown_core::{
    new_record_id, Amount, CompanyPrices, Customer, ExpenseCategory, ExpenseRecord,
    InvoiceStatus, LabourPrices, LabourRecord, NewInvoice, NewLabourRecord, PriceTable,
    ProcessCode, PurchaseRecord, SalesRecord, Shift, Staff,
};
use downtown_db::{Database, DbConfig};

const STAFF_NAMES: &[&str] = &[
    "Adaeze Okafor",
    "Babatunde Ade",
    "Chinedu Eze",
    "Funke Adeyemi",
    "Ibrahim Musa",
    "Ngozi Nwosu",
];

const CUSTOMER_NAMES: &[&str] = &[
    "Lagoon Plastics",
    "Ikeja Packaging",
    "Harbour Polymers",
    "Mainland Bottlers",
];

const LABOUR_TYPES: &[&str] = &[
    "labour recycling",
    "labour blending",
    "labour crushing waste",
    "labour crushing sack",
];

const PROCESSES: &[&[ProcessCode]] = &[
    &[ProcessCode::R],
    &[ProcessCode::C],
    &[ProcessCode::B],
    &[ProcessCode::R, ProcessCode::C],
    &[ProcessCode::C, ProcessCode::B],
    &[ProcessCode::R, ProcessCode::C, ProcessCode::B],
];

const PRODUCT_TYPES: &[&str] = &["pp", "injection", "hdpe"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut months: u32 = 6;
    let mut db_path = String::from("./downtown_dev.db");

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--months" | "-m" => {
                if i + 1 < args.len() {
                    months = args[i + 1].parse().unwrap_or(6).clamp(1, 36);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    db_path = args[i + 1].clone();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Downtown Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -m, --months <N>   Months of activity to generate (default: 6)");
                println!("  -d, --db <PATH>    Database file path (default: ./downtown_dev.db)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Downtown Seed Data Generator");
    println!("==============================");
    println!("Database: {}", db_path);
    println!("Months:   {}", months);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.staff().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} staff", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let prices = PriceTable {
        company_prices: CompanyPrices {
            recycling_kg: 250.0,
            blending_kg: 180.0,
            crushing_kg: 120.0,
        },
        labour_prices: LabourPrices {
            recycling: 15.0,
            blending: 10.0,
            crushing_waste: 6.0,
            crushing_sack: 4.0,
        },
    };
    db.prices().put(&prices).await?;
    println!("✓ Price settings saved");

    let roster: Vec<Staff> = STAFF_NAMES
        .iter()
        .enumerate()
        .map(|(idx, name)| Staff {
            id: new_record_id(),
            staff_id: Some(482_100 + idx as u32 * 37),
            name: name.to_string(),
            phone: format!("0803{:07}", 1_000_000 + idx * 4_321),
            date_added: "2024-01-08".to_string(),
        })
        .collect();
    for staff in &roster {
        db.staff().insert(staff).await?;
    }
    println!("✓ {} staff added", roster.len());

    let mut customers = Vec::with_capacity(CUSTOMER_NAMES.len());
    for (idx, name) in CUSTOMER_NAMES.iter().enumerate() {
        let customer = Customer {
            id: None,
            customer_id: Some(format!("{}{:04}", &name[..2].to_uppercase(), 1000 + idx * 7)),
            name: name.to_string(),
            contact: format!("0805{:07}", 2_000_000 + idx * 913),
            address: "Lagos".to_string(),
        };
        customers.push(db.customers().insert(&customer).await?);
    }
    println!("✓ {} customers added", customers.len());

    println!();
    println!("Generating activity...");

    let today = Utc::now().date_naive();
    let start = std::time::Instant::now();
    let mut seed = 0usize;
    let mut labour_count = 0usize;
    let mut invoice_count = 0usize;

    for back in (0..months).rev() {
        let Some(month_start) = today
            .with_day(1)
            .and_then(|first| first.checked_sub_months(Months::new(back)))
        else {
            continue;
        };

        for day in [3u32, 10, 17, 24] {
            let Some(date) = NaiveDate::from_ymd_opt(month_start.year(), month_start.month(), day)
            else {
                continue;
            };
            if date > today {
                continue;
            }
            let date = format_date(date);
            seed += 1;

            // Labour: one crew per shift
            for (shift_idx, time) in [Shift::Morning, Shift::Night].into_iter().enumerate() {
                let crew_size = 2 + (seed + shift_idx) % 3;
                let staffs = roster
                    .iter()
                    .cycle()
                    .skip(seed + shift_idx)
                    .take(crew_size)
                    .map(Staff::snapshot)
                    .collect();
                let new = NewLabourRecord {
                    staffs,
                    kg: 100.0 + ((seed * 37 + shift_idx * 11) % 400) as f64,
                    date: date.clone(),
                    time,
                    labour_type: LABOUR_TYPES[(seed + shift_idx) % LABOUR_TYPES.len()].to_string(),
                    amount: None,
                    member_share: None,
                };

                let id = new_record_id();
                let allocation = allocate_record(&id, &new, Some(&prices))?;
                let record = LabourRecord {
                    id,
                    staffs: new.staffs,
                    kg: new.kg,
                    date: new.date,
                    time: new.time,
                    labour_type: new.labour_type,
                    amount: allocation.amount,
                    member_share: allocation.member_share,
                };
                db.labour().insert(&record).await?;
                labour_count += 1;
            }

            // Invoice, moved along the status machine by age
            let customer = customers[seed % customers.len()].clone();
            let kg_in = 300.0 + ((seed * 53) % 900) as f64;
            let invoice = db
                .invoices()
                .create(NewInvoice {
                    customer: customer.clone(),
                    product_type: PRODUCT_TYPES[seed % PRODUCT_TYPES.len()].to_string(),
                    process_type: PROCESSES[seed % PROCESSES.len()].to_vec(),
                    kg_in,
                    kg_out: kg_in * 0.95,
                    amount: Amount::new(kg_in * prices.company_prices.recycling_kg),
                    recycler: Some(if seed % 2 == 0 { "a" } else { "b" }.to_string()),
                    date: date.clone(),
                })
                .await?;
            let status = match (back, seed % 4) {
                (0, 0) => InvoiceStatus::InProgress,
                (0, 1) => InvoiceStatus::Stopped,
                _ => InvoiceStatus::Completed,
            };
            if status != InvoiceStatus::InProgress {
                db.invoices().update_status(&invoice.id, status).await?;
            }
            invoice_count += 1;

            // Direct sale
            let sale_kg = 50.0 + ((seed * 29) % 200) as f64;
            db.sales()
                .insert(&SalesRecord {
                    id: new_record_id(),
                    date: date.clone(),
                    customer,
                    product_type: "flakes".to_string(),
                    kg: sale_kg,
                    amount: Amount::new(sale_kg * 400.0),
                })
                .await?;

            // Purchase, every other one from a known supplier
            let purchase_kg = 200.0 + ((seed * 41) % 600) as f64;
            db.purchases()
                .insert(&PurchaseRecord {
                    id: new_record_id(),
                    date: date.clone(),
                    customer: (seed % 2 == 0).then(|| customers[0].clone()),
                    product_type: "bottles".to_string(),
                    kg: purchase_kg,
                    amount: Amount::new(purchase_kg * 90.0),
                })
                .await?;

            // Expense
            let categories = ExpenseCategory::all();
            let category = categories[seed % categories.len()];
            db.expenses()
                .insert(&ExpenseRecord {
                    id: new_record_id(),
                    date,
                    category,
                    description: format!("{} for the week", category.as_str()),
                    amount: Amount::new(5_000.0 + ((seed * 97) % 20_000) as f64),
                })
                .await?;
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Generated {} labour records and {} invoices in {:?}",
        labour_count, invoice_count, elapsed
    );

    println!();
    println!("✓ Seed complete!");

    db.close().await;
    Ok(())
}
