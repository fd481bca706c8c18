//! # Labour Service
//!
//! Labour record intake and the current-month listing.
//!
//! ## Create Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  NewLabourRecord                                                       │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_new_labour_record ── bad date / unknown type ──► 400         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  amount + memberShare both given? ── yes ──► keep them                 │
//! │       │ no                                                              │
//! │       ▼                                                                 │
//! │  prices.get() ── none ──► 404 "Labour prices not found"                │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  allocate_record ──► LabourRecord { amount, memberShare } ──► insert   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::NaiveDate;
use serde::Serialize;
use tracing::info;

use downtown_core::allocation::allocate_record;
use downtown_core::calendar::current_month_window;
use downtown_core::validation::validate_new_labour_record;
use downtown_core::{new_record_id, LabourRecord, NewLabourRecord, Page, PageRequest};
use downtown_db::Database;

use crate::error::ReportResult;

/// One page of labour records, in the dashboard's listing shape.
#[derive(Debug, Clone, Serialize)]
pub struct LabourListing {
    pub total: u64,
    pub records: Vec<LabourRecord>,
}

impl From<Page<LabourRecord>> for LabourListing {
    fn from(page: Page<LabourRecord>) -> Self {
        LabourListing {
            total: page.total,
            records: page.items,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LabourService {
    db: Database,
}

impl LabourService {
    pub fn new(db: Database) -> Self {
        LabourService { db }
    }

    /// Validates, prices and stores a labour record.
    ///
    /// Prices are only read when the caller did not supply both `amount`
    /// and `memberShare`.
    pub async fn create_record(&self, new: NewLabourRecord) -> ReportResult<LabourRecord> {
        validate_new_labour_record(&new)?;

        let prices = if new.amount.is_some() && new.member_share.is_some() {
            None
        } else {
            self.db.prices().get().await?
        };

        let id = new_record_id();
        let allocation = allocate_record(&id, &new, prices.as_ref())?;

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
        self.db.labour().insert(&record).await?;

        info!(
            id = %record.id,
            labour_type = %record.labour_type,
            amount = %record.amount,
            member_share = %record.member_share,
            "Labour record created"
        );
        Ok(record)
    }

    /// Records of the month containing `today`, newest first.
    pub async fn current_month(
        &self,
        today: NaiveDate,
        page: PageRequest,
    ) -> ReportResult<LabourListing> {
        let (start, end) = current_month_window(today);
        let page = self.db.labour().list_page_between(&start, &end, page).await?;
        Ok(page.into())
    }

    /// Deletes a labour record.
    pub async fn delete(&self, id: &str) -> ReportResult<()> {
        self.db.labour().delete(id).await?;
        info!(id = %id, "Labour record deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures;
    use downtown_core::{Amount, Shift, StaffRef};

    fn new_record(date: &str, label: &str) -> NewLabourRecord {
        NewLabourRecord {
            staffs: vec![StaffRef::new("a", "Ada"), StaffRef::new("b", "Bola")],
            kg: 10.0,
            date: date.to_string(),
            time: Shift::Night,
            labour_type: label.to_string(),
            amount: None,
            member_share: None,
        }
    }

    #[tokio::test]
    async fn test_create_allocates_from_prices() {
        let db = fixtures::database().await;
        db.prices().put(&fixtures::prices()).await.unwrap();
        let service = LabourService::new(db.clone());

        let record = service
            .create_record(new_record("2025-03-04", "labour recycling"))
            .await
            .unwrap();
        assert_eq!(record.amount.value(), 1000.0);
        assert_eq!(record.member_share.value(), 500.0);

        let stored = db.labour().get_by_id(&record.id).await.unwrap().unwrap();
        assert_eq!(stored, record);
    }

    #[tokio::test]
    async fn test_create_without_prices_is_not_found() {
        let db = fixtures::database().await;
        let err = LabourService::new(db)
            .create_record(new_record("2025-03-04", "labour recycling"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Labour prices not found");
    }

    #[tokio::test]
    async fn test_supplied_amounts_are_kept() {
        let db = fixtures::database().await;
        let mut new = new_record("2025-03-04", "labour blending");
        new.amount = Some(Amount::new(700.0));
        new.member_share = Some(Amount::new(350.0));

        let record = LabourService::new(db).create_record(new).await.unwrap();
        assert_eq!(record.amount.value(), 700.0);
        assert_eq!(record.member_share.value(), 350.0);
    }

    #[tokio::test]
    async fn test_unknown_labour_type_is_rejected() {
        let db = fixtures::database().await;
        db.prices().put(&fixtures::prices()).await.unwrap();
        let err = LabourService::new(db)
            .create_record(new_record("2025-03-04", "labour sweeping"))
            .await
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }

    #[tokio::test]
    async fn test_current_month_listing() {
        let db = fixtures::database().await;
        db.prices().put(&fixtures::prices()).await.unwrap();
        let service = LabourService::new(db);

        service
            .create_record(new_record("2025-02-27", "labour recycling"))
            .await
            .unwrap();
        let first = service
            .create_record(new_record("2025-03-01", "labour recycling"))
            .await
            .unwrap();
        let second = service
            .create_record(new_record("2025-03-20", "labour crushing sack"))
            .await
            .unwrap();

        let today = NaiveDate::from_ymd_opt(2025, 3, 21).unwrap();
        let listing = service
            .current_month(today, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(listing.total, 2);
        let ids: Vec<_> = listing.records.iter().map(|r| r.id.clone()).collect();
        assert_eq!(ids, vec![second.id.clone(), first.id]);

        service.delete(&second.id).await.unwrap();
        let err = service.delete(&second.id).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
    }
}
