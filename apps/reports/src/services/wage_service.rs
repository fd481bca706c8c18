//! # Wage Service
//!
//! ```text
//! wages_by_type:  labour.list_all() ┐
//!                 prices.get()      ┴─► core::wages_by_type(records, labour_prices)
//!
//! monthly_wages:  month window(today) ─► labour.list_between(start, end) ┐
//!                                        staff.list_all()                ┴─► core::monthly_wages
//! ```

use chrono::NaiveDate;
use tracing::{debug, warn};

use downtown_core::calendar::{current_month_window, month_window};
use downtown_core::validation::check_labour_record;
use downtown_core::wages::{self, StaffLabourSummary, StaffWageSummary};
use downtown_core::{LabourRecord, PriceTable};
use downtown_db::Database;

use crate::error::{ReportError, ReportResult};

#[derive(Debug, Clone)]
pub struct WageService {
    db: Database,
}

impl WageService {
    pub fn new(db: Database) -> Self {
        WageService { db }
    }

    /// Lifetime kg and pay per staff member, split by labour type.
    ///
    /// ## Errors
    /// `NOT_FOUND` when no price settings exist.
    pub async fn wages_by_type(&self) -> ReportResult<Vec<StaffLabourSummary>> {
        let labour = self.db.labour();
        let prices = self.db.prices();
        let (records, prices) = tokio::try_join!(labour.list_all(), prices.get())?;
        let table = PriceTable::require(prices.as_ref())?;

        warn_on_malformed(&records);
        let summaries = wages::wages_by_type(&records, &table.labour_prices);

        debug!(
            records = records.len(),
            staff = summaries.len(),
            "Computed wages by labour type"
        );
        Ok(summaries)
    }

    /// Wage per roster entry for the month containing `today`.
    pub async fn monthly_wages(&self, today: NaiveDate) -> ReportResult<Vec<StaffWageSummary>> {
        let (start, end) = current_month_window(today);
        self.wages_between(&start, &end).await
    }

    /// Wage per roster entry for an arbitrary month.
    pub async fn monthly_wages_for(
        &self,
        year: i32,
        month: u32,
    ) -> ReportResult<Vec<StaffWageSummary>> {
        let (start, end) = month_window(year, month)
            .ok_or_else(|| ReportError::validation(format!("Invalid month {year}-{month:02}")))?;
        self.wages_between(&start, &end).await
    }

    async fn wages_between(&self, start: &str, end: &str) -> ReportResult<Vec<StaffWageSummary>> {
        let labour = self.db.labour();
        let staff = self.db.staff();
        let (records, roster) =
            tokio::try_join!(labour.list_between(start, end), staff.list_all())?;

        warn_on_malformed(&records);
        let summaries = wages::monthly_wages(&records, &roster, start, end);

        debug!(
            start,
            end,
            records = records.len(),
            roster = roster.len(),
            "Computed monthly wages"
        );
        Ok(summaries)
    }
}

/// Logs records the wage folds will skip.
fn warn_on_malformed(records: &[LabourRecord]) {
    let malformed: Vec<&str> = records
        .iter()
        .filter(|r| check_labour_record(r).is_err())
        .map(|r| r.id.as_str())
        .collect();

    if !malformed.is_empty() {
        warn!(
            count = malformed.len(),
            ids = ?malformed,
            "Skipping malformed labour records"
        );
    }
}
