//! # Business Statistics
//!
//! Stateless folds over record collections for the dashboard.
//!
//! ## Statistic Catalogue
//! ```text
//! ┌───────────────────────────┬──────────────────────┬──────────────────────┐
//! │ Fold                      │ Records              │ Filter               │
//! ├───────────────────────────┼──────────────────────┼──────────────────────┤
//! │ grand_totals              │ all collections      │ none                 │
//! │ monthly_invoice_kg        │ invoices (kgIn)      │ year                 │
//! │ monthly_sales             │ sales (amount)       │ year                 │
//! │ monthly_process_sales     │ invoices (amount)    │ year + completed     │
//! │ process_type_counts       │ invoices             │ completed            │
//! │ recycler_comparison       │ invoices (kgIn)      │ recycler a/b, ANY yr │
//! │ top_customers             │ invoices (amount)    │ completed            │
//! └───────────────────────────┴──────────────────────┴──────────────────────┘
//! ```
//!
//! Month series always carry all twelve months, Jan..Dec, zero-filled.
//! Records whose date is not `YYYY-MM-DD` are left out of every
//! date-based fold.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::calendar::{self, month_labels};
use crate::money::Amount;
use crate::types::{
    ExpenseRecord, InvoiceRecord, ProcessCode, PurchaseRecord, Recycler, SalesRecord,
};

// =============================================================================
// Dated Records
// =============================================================================

/// A record that carries a `YYYY-MM-DD` date.
pub trait Dated {
    fn date(&self) -> &str;
}

impl Dated for SalesRecord {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for InvoiceRecord {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for PurchaseRecord {
    fn date(&self) -> &str {
        &self.date
    }
}

impl Dated for ExpenseRecord {
    fn date(&self) -> &str {
        &self.date
    }
}

/// Counts records whose date cannot be placed in a month.
pub fn undated_count<T: Dated>(records: &[T]) -> usize {
    records
        .iter()
        .filter(|r| calendar::year_month(r.date()).is_none())
        .count()
}

// =============================================================================
// Grand Totals
// =============================================================================

/// Count and summed amount of a collection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CountAmount {
    pub count: u64,
    pub amount: Amount,
}

/// Headline figures across every collection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GrandTotals {
    pub total_direct_sales: CountAmount,
    /// All invoices regardless of status.
    pub total_process_sales: CountAmount,
    /// Sum of invoice `kgIn`.
    pub total_kg: f64,
    pub total_expenses: CountAmount,
    pub total_purchase_kg: f64,
    pub total_purchase_amount: Amount,
    pub total_customers: u64,
    pub total_staff_count: u64,
}

/// Snapshot of the collections the totals are computed over.
///
/// Customers and staff are only counted, so they are passed as counts.
/// A missing collection is an empty slice and contributes zeros.
#[derive(Debug, Clone, Copy, Default)]
pub struct Collections<'a> {
    pub sales: &'a [SalesRecord],
    pub invoices: &'a [InvoiceRecord],
    pub expenses: &'a [ExpenseRecord],
    pub purchases: &'a [PurchaseRecord],
    pub customer_count: u64,
    pub staff_count: u64,
}

/// Computes the headline totals.
pub fn grand_totals(collections: &Collections<'_>) -> GrandTotals {
    let sales = CountAmount {
        count: collections.sales.len() as u64,
        amount: collections.sales.iter().map(|s| s.amount).sum(),
    };

    let invoices = CountAmount {
        count: collections.invoices.len() as u64,
        amount: collections.invoices.iter().map(|i| i.amount).sum(),
    };

    let expenses = CountAmount {
        count: collections.expenses.len() as u64,
        amount: collections.expenses.iter().map(|e| e.amount).sum(),
    };

    GrandTotals {
        total_direct_sales: sales,
        total_process_sales: invoices,
        total_kg: collections.invoices.iter().map(|i| i.kg_in).sum(),
        total_expenses: expenses,
        total_purchase_kg: collections.purchases.iter().map(|p| p.kg).sum(),
        total_purchase_amount: collections.purchases.iter().map(|p| p.amount).sum(),
        total_customers: collections.customer_count,
        total_staff_count: collections.staff_count,
    }
}

// =============================================================================
// Monthly Series
// =============================================================================

/// Twelve monthly values with their labels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MonthlySeries {
    pub labels: Vec<String>,
    pub values: Vec<f64>,
}

impl MonthlySeries {
    fn from_buckets(buckets: [f64; 12]) -> Self {
        MonthlySeries {
            labels: month_labels(),
            values: buckets.to_vec(),
        }
    }
}

/// Sums `value` per calendar month.
///
/// With `year_filter` set, only records dated in that year count; with
/// `None`, months from every year are folded together.
///
/// ## Example
/// ```rust
/// use downtown_core::stats::monthly_series;
/// use downtown_core::types::SalesRecord;
///
/// let sales: Vec<SalesRecord> = Vec::new();
/// let series = monthly_series(&sales, |s| s.amount.value(), Some(2025));
/// assert_eq!(series.labels.len(), 12);
/// assert!(series.values.iter().all(|v| *v == 0.0));
/// ```
pub fn monthly_series<T, F>(records: &[T], value: F, year_filter: Option<i32>) -> MonthlySeries
where
    T: Dated,
    F: Fn(&T) -> f64,
{
    let mut buckets = [0.0_f64; 12];

    for record in records {
        let Some((year, month)) = calendar::year_month(record.date()) else {
            continue;
        };
        if year_filter.is_some_and(|wanted| wanted != year) {
            continue;
        }
        buckets[(month - 1) as usize] += value(record);
    }

    MonthlySeries::from_buckets(buckets)
}

/// Invoice `kgIn` per month of `year`.
pub fn monthly_invoice_kg(invoices: &[InvoiceRecord], year: i32) -> MonthlySeries {
    monthly_series(invoices, |i| i.kg_in, Some(year))
}

/// Direct sales amount per month of `year`.
pub fn monthly_sales(sales: &[SalesRecord], year: i32) -> MonthlySeries {
    monthly_series(sales, |s| s.amount.value(), Some(year))
}

/// Completed invoice amount per month of `year`.
pub fn monthly_process_sales(invoices: &[InvoiceRecord], year: i32) -> MonthlySeries {
    monthly_series(
        invoices,
        |i| {
            if i.status.is_completed() {
                i.amount.value()
            } else {
                0.0
            }
        },
        Some(year),
    )
}

/// Month series shaped for the kg chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlyKgResponse {
    pub labels: Vec<String>,
    pub kg_counts: Vec<f64>,
}

impl From<MonthlySeries> for MonthlyKgResponse {
    fn from(series: MonthlySeries) -> Self {
        MonthlyKgResponse {
            labels: series.labels,
            kg_counts: series.values,
        }
    }
}

/// Month series shaped for the sales charts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct MonthlySalesResponse {
    pub labels: Vec<String>,
    pub sales_amounts: Vec<f64>,
}

impl From<MonthlySeries> for MonthlySalesResponse {
    fn from(series: MonthlySeries) -> Self {
        MonthlySalesResponse {
            labels: series.labels,
            sales_amounts: series.values,
        }
    }
}

// =============================================================================
// Process Type Counts
// =============================================================================

/// Display labels for every process combination, in chart order.
pub const PROCESS_LABELS: [&str; 7] = ["R", "C", "B", "R-C", "R-B", "C-B", "R-C-B"];

/// Canonical label for a set of process codes.
///
/// Codes are de-duplicated and ordered R, C, B whatever order they were
/// stored in. An empty list has no label.
///
/// ## Example
/// ```rust
/// use downtown_core::stats::process_label;
/// use downtown_core::types::ProcessCode::{B, C, R};
///
/// assert_eq!(process_label(&[C, R]), Some("R-C".to_string()));
/// assert_eq!(process_label(&[B, R, C, R]), Some("R-C-B".to_string()));
/// assert_eq!(process_label(&[]), None);
/// ```
pub fn process_label(codes: &[ProcessCode]) -> Option<String> {
    let mut unique: Vec<ProcessCode> = codes.to_vec();
    unique.sort();
    unique.dedup();

    if unique.is_empty() {
        return None;
    }

    Some(
        unique
            .iter()
            .map(ProcessCode::as_str)
            .collect::<Vec<_>>()
            .join("-"),
    )
}

/// Completed invoice counts per process combination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProcessTypeCounts {
    pub labels: Vec<String>,
    pub counts: Vec<u64>,
}

/// Counts completed invoices by process combination.
///
/// Always returns the seven labels of [`PROCESS_LABELS`]. Invoices with no
/// process codes are not counted.
pub fn process_type_counts(invoices: &[InvoiceRecord]) -> ProcessTypeCounts {
    let mut counts = [0_u64; 7];

    for invoice in invoices.iter().filter(|i| i.status.is_completed()) {
        let Some(label) = process_label(&invoice.process_type) else {
            continue;
        };
        if let Some(slot) = PROCESS_LABELS.iter().position(|l| *l == label) {
            counts[slot] += 1;
        }
    }

    ProcessTypeCounts {
        labels: PROCESS_LABELS.iter().map(|l| l.to_string()).collect(),
        counts: counts.to_vec(),
    }
}

// =============================================================================
// Recycler Comparison
// =============================================================================

/// Monthly `kgIn` of recycler A against recycler B.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct RecyclerComparison {
    pub labels: Vec<String>,
    pub recycler_a: Vec<f64>,
    pub recycler_b: Vec<f64>,
}

/// Sums invoice `kgIn` per month for each recycler.
///
/// Every status and every year counts; only the month is used.
pub fn recycler_comparison(invoices: &[InvoiceRecord]) -> RecyclerComparison {
    let mut a = [0.0_f64; 12];
    let mut b = [0.0_f64; 12];

    for invoice in invoices {
        let Some(recycler) = invoice.recycler() else {
            continue;
        };
        let Some((_, month)) = calendar::year_month(&invoice.date) else {
            continue;
        };

        let slot = (month - 1) as usize;
        match recycler {
            Recycler::A => a[slot] += invoice.kg_in,
            Recycler::B => b[slot] += invoice.kg_in,
        }
    }

    RecyclerComparison {
        labels: month_labels(),
        recycler_a: a.to_vec(),
        recycler_b: b.to_vec(),
    }
}

// =============================================================================
// Top Customers
// =============================================================================

/// Highest-earning customers, best first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct TopCustomers {
    pub labels: Vec<String>,
    pub sales_amounts: Vec<f64>,
}

/// Ranks customers by completed invoice amount and keeps the first `n`.
///
/// Customers are grouped by name. Equal totals keep the order in which the
/// customer first appears in `invoices`.
pub fn top_customers(invoices: &[InvoiceRecord], n: usize) -> TopCustomers {
    let mut totals: Vec<(String, Amount)> = Vec::new();
    let mut index: HashMap<&str, usize> = HashMap::new();

    for invoice in invoices.iter().filter(|i| i.status.is_completed()) {
        let name = invoice.customer.name.as_str();
        match index.get(name) {
            Some(&slot) => totals[slot].1 += invoice.amount,
            None => {
                index.insert(name, totals.len());
                totals.push((name.to_string(), invoice.amount));
            }
        }
    }

    // sort_by is stable, so ties stay in first-seen order
    totals.sort_by(|x, y| y.1.value().total_cmp(&x.1.value()));
    totals.truncate(n);

    let (labels, sales_amounts): (Vec<String>, Vec<f64>) = totals
        .into_iter()
        .map(|(name, amount)| (name, amount.value()))
        .unzip();

    TopCustomers {
        labels,
        sales_amounts,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Customer, ExpenseCategory, InvoiceStatus};
    use crate::types::ProcessCode::{B, C, R};

    fn customer(name: &str) -> Customer {
        Customer {
            id: Some(format!("id-{}", name)),
            customer_id: None,
            name: name.to_string(),
            contact: String::new(),
            address: String::new(),
        }
    }

    fn invoice(date: &str, status: InvoiceStatus, codes: &[ProcessCode]) -> InvoiceRecord {
        InvoiceRecord {
            id: format!("inv-{}", date),
            customer: customer("Acme"),
            product_type: "pp".to_string(),
            process_type: codes.to_vec(),
            kg_in: 0.0,
            kg_out: 0.0,
            amount: Amount::zero(),
            status,
            recycler: None,
            date: date.to_string(),
        }
    }

    fn sale(date: &str, amount: f64) -> SalesRecord {
        SalesRecord {
            id: format!("sale-{}", date),
            date: date.to_string(),
            customer: customer("Walk-in"),
            product_type: "pp".to_string(),
            kg: 1.0,
            amount: Amount::new(amount),
        }
    }

    #[test]
    fn test_grand_totals() {
        let sales = vec![sale("2025-01-01", 100.0), sale("2025-02-01", 50.0)];
        let mut inv = invoice("2025-01-05", InvoiceStatus::InProgress, &[R]);
        inv.amount = Amount::new(400.0);
        inv.kg_in = 80.0;
        let mut done = invoice("2025-01-06", InvoiceStatus::Completed, &[C]);
        done.amount = Amount::new(600.0);
        done.kg_in = 20.0;
        let invoices = vec![inv, done];
        let expenses = vec![ExpenseRecord {
            id: "e1".to_string(),
            date: "2025-01-03".to_string(),
            category: ExpenseCategory::Utilities,
            description: "Power".to_string(),
            amount: Amount::new(75.0),
        }];
        let purchases = vec![PurchaseRecord {
            id: "p1".to_string(),
            date: "2025-01-04".to_string(),
            customer: None,
            product_type: "pp".to_string(),
            kg: 300.0,
            amount: Amount::new(900.0),
        }];

        let totals = grand_totals(&Collections {
            sales: &sales,
            invoices: &invoices,
            expenses: &expenses,
            purchases: &purchases,
            customer_count: 4,
            staff_count: 9,
        });

        assert_eq!(totals.total_direct_sales.count, 2);
        assert_eq!(totals.total_direct_sales.amount.value(), 150.0);
        assert_eq!(totals.total_process_sales.count, 2);
        assert_eq!(totals.total_process_sales.amount.value(), 1000.0);
        assert_eq!(totals.total_kg, 100.0);
        assert_eq!(totals.total_expenses.count, 1);
        assert_eq!(totals.total_expenses.amount.value(), 75.0);
        assert_eq!(totals.total_purchase_kg, 300.0);
        assert_eq!(totals.total_purchase_amount.value(), 900.0);
        assert_eq!(totals.total_customers, 4);
        assert_eq!(totals.total_staff_count, 9);
    }

    #[test]
    fn test_grand_totals_empty() {
        let totals = grand_totals(&Collections::default());
        assert_eq!(totals, GrandTotals::default());
    }

    #[test]
    fn test_grand_totals_wire_names() {
        let json = serde_json::to_value(GrandTotals::default()).unwrap();
        assert!(json.get("total_direct_sales").is_some());
        assert!(json["total_process_sales"].get("count").is_some());
        assert!(json.get("total_staff_count").is_some());
    }

    #[test]
    fn test_monthly_sales_year_filter_and_zero_fill() {
        let sales = vec![
            sale("2025-01-10", 100.0),
            sale("2025-01-20", 50.0),
            sale("2025-12-31", 7.0),
            sale("2024-01-10", 999.0),
            sale("bad-date", 1.0),
        ];
        let series = monthly_sales(&sales, 2025);

        assert_eq!(series.labels.len(), 12);
        assert_eq!(series.labels[0], "Jan");
        assert_eq!(series.values[0], 150.0);
        assert_eq!(series.values[11], 7.0);
        assert_eq!(series.values.iter().sum::<f64>(), 157.0);
    }

    #[test]
    fn test_monthly_series_without_year_filter() {
        let sales = vec![sale("2024-03-01", 10.0), sale("2025-03-01", 5.0)];
        let series = monthly_series(&sales, |s| s.amount.value(), None);
        assert_eq!(series.values[2], 15.0);
    }

    #[test]
    fn test_monthly_invoice_kg() {
        let mut a = invoice("2025-06-01", InvoiceStatus::InProgress, &[R]);
        a.kg_in = 40.0;
        let mut b = invoice("2025-06-15", InvoiceStatus::Completed, &[R]);
        b.kg_in = 60.0;

        let response: MonthlyKgResponse = monthly_invoice_kg(&[a, b], 2025).into();
        assert_eq!(response.kg_counts[5], 100.0);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("kgCounts").is_some());
    }

    #[test]
    fn test_monthly_process_sales_completed_only() {
        let mut open = invoice("2025-02-01", InvoiceStatus::Stopped, &[R]);
        open.amount = Amount::new(500.0);
        let mut done = invoice("2025-02-02", InvoiceStatus::Completed, &[R]);
        done.amount = Amount::new(300.0);

        let series = monthly_process_sales(&[open, done], 2025);
        assert_eq!(series.values[1], 300.0);
    }

    #[test]
    fn test_process_label_permutation_invariant() {
        assert_eq!(process_label(&[C, R]), process_label(&[R, C]));
        assert_eq!(process_label(&[B, C]).as_deref(), Some("C-B"));
        assert_eq!(process_label(&[B, R]).as_deref(), Some("R-B"));
        assert_eq!(process_label(&[B, C, R]).as_deref(), Some("R-C-B"));
        assert_eq!(process_label(&[R, R]).as_deref(), Some("R"));
    }

    #[test]
    fn test_process_label_matches_alphabetical_remap() {
        // alphabetical-sort key -> display key
        let remap = [
            ("R", "R"),
            ("C", "C"),
            ("B", "B"),
            ("B-C", "C-B"),
            ("B-R", "R-B"),
            ("C-R", "R-C"),
            ("B-C-R", "R-C-B"),
        ];
        for (alphabetical, display) in remap {
            let codes: Vec<ProcessCode> = alphabetical
                .split('-')
                .map(|c| c.parse().unwrap())
                .collect();
            assert_eq!(process_label(&codes).as_deref(), Some(display));
        }
    }

    #[test]
    fn test_process_type_counts_example() {
        let invoices = vec![
            invoice("2025-01-01", InvoiceStatus::Completed, &[R]),
            invoice("2025-01-02", InvoiceStatus::Completed, &[C, R]),
            invoice("2025-01-03", InvoiceStatus::Completed, &[R, C]),
            invoice("2025-01-04", InvoiceStatus::InProgress, &[B]),
            invoice("2025-01-05", InvoiceStatus::Completed, &[]),
        ];
        let counts = process_type_counts(&invoices);

        assert_eq!(counts.labels, PROCESS_LABELS.to_vec());
        assert_eq!(counts.counts, vec![1, 0, 0, 2, 0, 0, 0]);
    }

    #[test]
    fn test_recycler_comparison_empty() {
        let invoices = vec![invoice("2025-01-01", InvoiceStatus::Completed, &[R])];
        let cmp = recycler_comparison(&invoices);
        assert_eq!(cmp.labels.len(), 12);
        assert_eq!(cmp.recycler_a, vec![0.0; 12]);
        assert_eq!(cmp.recycler_b, vec![0.0; 12]);
    }

    #[test]
    fn test_recycler_comparison_ignores_year_and_case() {
        let mut a1 = invoice("2023-03-01", InvoiceStatus::InProgress, &[R]);
        a1.recycler = Some("A".to_string());
        a1.kg_in = 10.0;
        let mut a2 = invoice("2025-03-09", InvoiceStatus::Completed, &[R]);
        a2.recycler = Some("a".to_string());
        a2.kg_in = 5.0;
        let mut b1 = invoice("2025-11-02", InvoiceStatus::Stopped, &[C]);
        b1.recycler = Some("b".to_string());
        b1.kg_in = 7.5;
        let mut other = invoice("2025-03-02", InvoiceStatus::Completed, &[C]);
        other.recycler = Some("z".to_string());
        other.kg_in = 100.0;

        let cmp = recycler_comparison(&[a1, a2, b1, other]);
        assert_eq!(cmp.recycler_a[2], 15.0);
        assert_eq!(cmp.recycler_b[10], 7.5);
        assert_eq!(cmp.recycler_a.iter().sum::<f64>(), 15.0);

        let json = serde_json::to_value(&cmp).unwrap();
        assert!(json.get("recyclerA").is_some());
    }

    #[test]
    fn test_top_customers_ranking_and_ties() {
        let mut invoices = Vec::new();
        for (name, amount, status) in [
            ("Zed", 100.0, InvoiceStatus::Completed),
            ("Ada", 300.0, InvoiceStatus::Completed),
            ("Bola", 100.0, InvoiceStatus::Completed),
            ("Zed", 50.0, InvoiceStatus::Completed),
            ("Chidi", 10_000.0, InvoiceStatus::InProgress),
            ("Dayo", 20.0, InvoiceStatus::Completed),
            ("Efe", 5.0, InvoiceStatus::Completed),
            ("Femi", 1.0, InvoiceStatus::Completed),
        ] {
            let mut inv = invoice("2025-01-01", status, &[R]);
            inv.customer = customer(name);
            inv.amount = Amount::new(amount);
            invoices.push(inv);
        }

        let top = top_customers(&invoices, 5);
        assert_eq!(top.labels, vec!["Ada", "Zed", "Bola", "Dayo", "Efe"]);
        assert_eq!(top.sales_amounts, vec![300.0, 150.0, 100.0, 20.0, 5.0]);
    }

    #[test]
    fn test_top_customers_tie_keeps_first_seen() {
        let mut invoices = Vec::new();
        for name in ["Bola", "Ada"] {
            let mut inv = invoice("2025-01-01", InvoiceStatus::Completed, &[R]);
            inv.customer = customer(name);
            inv.amount = Amount::new(10.0);
            invoices.push(inv);
        }
        let top = top_customers(&invoices, 5);
        assert_eq!(top.labels, vec!["Bola", "Ada"]);
    }

    #[test]
    fn test_undated_count() {
        let sales = vec![sale("2025-01-01", 1.0), sale("01/02/2025", 1.0)];
        assert_eq!(undated_count(&sales), 1);
    }

    #[test]
    fn test_impossible_date_is_undated() {
        let sales = vec![sale("2025-02-28", 10.0), sale("2025-02-30", 4.0)];
        let series = monthly_sales(&sales, 2025);
        assert_eq!(series.values[1], 10.0);
        assert_eq!(undated_count(&sales), 1);
    }
}
