//! # Labour Repository
//!
//! Storage for labour records. `amount` and `member_share` arrive already
//! computed; this layer never prices anything.
//!
//! ## Query Shapes
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  list_all            → every record (lifetime wage summary)            │
//! │  list_between(s, e)  → s <= date <= e (monthly wage summary)           │
//! │  list_page_between   → same window, newest first, skip/limit           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{from_json, now_timestamp, to_json};
use downtown_core::{Amount, LabourRecord, Page, PageRequest, Shift, StaffRef};

#[derive(Debug, sqlx::FromRow)]
struct LabourRow {
    id: String,
    staffs: String,
    kg: f64,
    date: String,
    time: Shift,
    labour_type: String,
    amount: f64,
    member_share: f64,
}

impl TryFrom<LabourRow> for LabourRecord {
    type Error = DbError;

    fn try_from(row: LabourRow) -> DbResult<Self> {
        let staffs: Vec<StaffRef> = from_json(&row.staffs)?;
        Ok(LabourRecord {
            id: row.id,
            staffs,
            kg: row.kg,
            date: row.date,
            time: row.time,
            labour_type: row.labour_type,
            amount: Amount::new(row.amount),
            member_share: Amount::new(row.member_share),
        })
    }
}

fn collect(rows: Vec<LabourRow>) -> DbResult<Vec<LabourRecord>> {
    rows.into_iter().map(LabourRecord::try_from).collect()
}

const SELECT_COLUMNS: &str =
    "SELECT id, staffs, kg, date, time, labour_type, amount, member_share FROM labour_records";

/// Repository for labour record operations.
#[derive(Debug, Clone)]
pub struct LabourRepository {
    pool: SqlitePool,
}

impl LabourRepository {
    /// Creates a new LabourRepository.
    pub fn new(pool: SqlitePool) -> Self {
        LabourRepository { pool }
    }

    /// Stores a fully computed labour record.
    pub async fn insert(&self, record: &LabourRecord) -> DbResult<()> {
        debug!(
            id = %record.id,
            labour_type = %record.labour_type,
            staff = record.staffs.len(),
            "Inserting labour record"
        );

        sqlx::query(
            r#"
            INSERT INTO labour_records (
                id, staffs, kg, date, time, labour_type, amount, member_share, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)
            "#,
        )
        .bind(&record.id)
        .bind(to_json(&record.staffs)?)
        .bind(record.kg)
        .bind(&record.date)
        .bind(record.time)
        .bind(&record.labour_type)
        .bind(record.amount.value())
        .bind(record.member_share.value())
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Gets a labour record by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<LabourRecord>> {
        let row = sqlx::query_as::<_, LabourRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(LabourRecord::try_from).transpose()
    }

    /// Every labour record in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<LabourRecord>> {
        let rows = sqlx::query_as::<_, LabourRow>(&format!("{SELECT_COLUMNS} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        collect(rows)
    }

    /// Records dated within `start..=end` (YYYY-MM-DD, inclusive).
    pub async fn list_between(&self, start: &str, end: &str) -> DbResult<Vec<LabourRecord>> {
        let rows = sqlx::query_as::<_, LabourRow>(&format!(
            "{SELECT_COLUMNS} WHERE date >= ?1 AND date <= ?2 ORDER BY rowid"
        ))
        .bind(start)
        .bind(end)
        .fetch_all(&self.pool)
        .await?;

        collect(rows)
    }

    /// One page of the `start..=end` window, most recently created first.
    pub async fn list_page_between(
        &self,
        start: &str,
        end: &str,
        page: PageRequest,
    ) -> DbResult<Page<LabourRecord>> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM labour_records WHERE date >= ?1 AND date <= ?2",
        )
        .bind(start)
        .bind(end)
        .fetch_one(&self.pool)
        .await?;

        let rows = sqlx::query_as::<_, LabourRow>(&format!(
            "{SELECT_COLUMNS} WHERE date >= ?1 AND date <= ?2 ORDER BY rowid DESC LIMIT ?3 OFFSET ?4"
        ))
        .bind(start)
        .bind(end)
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            total: total.max(0) as u64,
            items: collect(rows)?,
        })
    }

    /// Deletes a labour record.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting labour record");

        let result = sqlx::query("DELETE FROM labour_records WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Labour record", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn record(id: &str, date: &str, kg: f64) -> LabourRecord {
        LabourRecord {
            id: id.to_string(),
            staffs: vec![StaffRef::new("s-1", "Ada"), StaffRef::new("s-2", "Bola")],
            kg,
            date: date.to_string(),
            time: Shift::Night,
            labour_type: "labour recycling".to_string(),
            amount: Amount::new(kg * 100.0),
            member_share: Amount::new(kg * 50.0),
        }
    }

    #[tokio::test]
    async fn test_insert_and_read_back_snapshots() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let original = record("l-1", "2025-03-04", 10.0);
        db.labour().insert(&original).await.unwrap();

        let stored = db.labour().get_by_id("l-1").await.unwrap().unwrap();
        assert_eq!(stored, original);
    }

    #[tokio::test]
    async fn test_window_is_inclusive() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.labour();
        repo.insert(&record("feb", "2025-02-28", 1.0)).await.unwrap();
        repo.insert(&record("first", "2025-03-01", 1.0)).await.unwrap();
        repo.insert(&record("last", "2025-03-31", 1.0)).await.unwrap();
        repo.insert(&record("apr", "2025-04-01", 1.0)).await.unwrap();

        let march = repo.list_between("2025-03-01", "2025-03-31").await.unwrap();
        let ids: Vec<_> = march.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["first", "last"]);
        assert_eq!(repo.list_all().await.unwrap().len(), 4);
    }

    #[tokio::test]
    async fn test_page_is_newest_first() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.labour();
        for i in 1..=4 {
            repo.insert(&record(&format!("l-{i}"), "2025-03-10", i as f64))
                .await
                .unwrap();
        }

        let page = repo
            .list_page_between("2025-03-01", "2025-03-31", PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total, 4);
        let ids: Vec<_> = page.items.iter().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["l-3", "l-2"]);
    }

    #[tokio::test]
    async fn test_corrupt_snapshot_column() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        sqlx::query(
            "INSERT INTO labour_records (id, staffs, kg, date, time, labour_type, created_at)
             VALUES ('bad', 'not json', 1, '2025-03-01', 'morning', 'labour blending', '')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.labour().list_all().await.unwrap_err();
        assert!(matches!(err, DbError::Serialization(_)));
    }

    #[tokio::test]
    async fn test_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.labour()
            .insert(&record("l-1", "2025-03-04", 1.0))
            .await
            .unwrap();
        db.labour().delete("l-1").await.unwrap();
        assert!(db.labour().get_by_id("l-1").await.unwrap().is_none());
        assert!(db.labour().delete("l-1").await.is_err());
    }
}
