//! # Stats Service
//!
//! Dashboard statistics over invoices, sales, purchases and expenses.
//!
//! | Report                 | Invoices read   | Year            |
//! |------------------------|-----------------|-----------------|
//! | grand totals           | all             | any             |
//! | monthly kg             | all             | `today`'s year  |
//! | monthly process sales  | completed       | `today`'s year  |
//! | process types          | completed       | any             |
//! | recyclers              | all             | any             |
//! | top customers          | completed       | any             |
//!
//! Monthly direct sales read every sales record for `today`'s year.

use chrono::{Datelike, NaiveDate};
use tracing::{debug, warn};

use downtown_core::stats::{
    self, Collections, GrandTotals, MonthlyKgResponse, MonthlySalesResponse, ProcessTypeCounts,
    RecyclerComparison, TopCustomers,
};
use downtown_db::Database;

use crate::error::ReportResult;

#[derive(Debug, Clone)]
pub struct StatsService {
    db: Database,
}

impl StatsService {
    pub fn new(db: Database) -> Self {
        StatsService { db }
    }

    /// Headline counts and sums across every collection.
    pub async fn grand_totals(&self) -> ReportResult<GrandTotals> {
        let sales_repo = self.db.sales();
        let invoice_repo = self.db.invoices();
        let expense_repo = self.db.expenses();
        let purchase_repo = self.db.purchases();
        let customer_repo = self.db.customers();
        let staff_repo = self.db.staff();

        let (sales, invoices, expenses, purchases, customer_count, staff_count) = tokio::try_join!(
            sales_repo.list_all(),
            invoice_repo.list_all(),
            expense_repo.list_all(),
            purchase_repo.list_all(),
            customer_repo.count(),
            staff_repo.count(),
        )?;

        let undated = stats::undated_count(&sales)
            + stats::undated_count(&invoices)
            + stats::undated_count(&expenses)
            + stats::undated_count(&purchases);
        if undated > 0 {
            warn!(undated, "Records with unreadable dates are counted in totals only");
        }

        let totals = stats::grand_totals(&Collections {
            sales: &sales,
            invoices: &invoices,
            expenses: &expenses,
            purchases: &purchases,
            customer_count,
            staff_count,
        });
        debug!(
            invoices = invoices.len(),
            sales = sales.len(),
            "Computed grand totals"
        );
        Ok(totals)
    }

    /// Invoice `kgIn` per month of `today`'s year.
    pub async fn monthly_kg(&self, today: NaiveDate) -> ReportResult<MonthlyKgResponse> {
        let invoices = self.db.invoices().list_all().await?;
        Ok(stats::monthly_invoice_kg(&invoices, today.year()).into())
    }

    /// Direct sales amount per month of `today`'s year.
    pub async fn monthly_sales(&self, today: NaiveDate) -> ReportResult<MonthlySalesResponse> {
        let sales = self.db.sales().list_all().await?;
        Ok(stats::monthly_sales(&sales, today.year()).into())
    }

    /// Completed invoice amount per month of `today`'s year.
    pub async fn monthly_process_sales(
        &self,
        today: NaiveDate,
    ) -> ReportResult<MonthlySalesResponse> {
        let invoices = self.db.invoices().list_completed().await?;
        Ok(stats::monthly_process_sales(&invoices, today.year()).into())
    }

    /// Completed invoices per process combination.
    pub async fn process_types(&self) -> ReportResult<ProcessTypeCounts> {
        let invoices = self.db.invoices().list_completed().await?;
        Ok(stats::process_type_counts(&invoices))
    }

    /// Monthly `kgIn` of recycler A against recycler B.
    pub async fn recyclers(&self) -> ReportResult<RecyclerComparison> {
        let invoices = self.db.invoices().list_all().await?;
        Ok(stats::recycler_comparison(&invoices))
    }

    /// The `n` customers with the highest completed invoice amount.
    pub async fn top_customers(&self, n: usize) -> ReportResult<TopCustomers> {
        let invoices = self.db.invoices().list_completed().await?;
        Ok(stats::top_customers(&invoices, n))
    }
}
