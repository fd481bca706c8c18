//! # Purchase Repository
//!
//! Material bought in. The supplier snapshot is optional.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{from_json, now_timestamp, to_json};
use downtown_core::{Amount, CustomerRef, Page, PageRequest, PurchaseRecord};

#[derive(Debug, sqlx::FromRow)]
struct PurchaseRow {
    id: String,
    date: String,
    customer: Option<String>,
    product_type: String,
    kg: f64,
    amount: f64,
}

impl TryFrom<PurchaseRow> for PurchaseRecord {
    type Error = DbError;

    fn try_from(row: PurchaseRow) -> DbResult<Self> {
        let customer: Option<CustomerRef> = row.customer.as_deref().map(from_json).transpose()?;
        Ok(PurchaseRecord {
            id: row.id,
            date: row.date,
            customer,
            product_type: row.product_type,
            kg: row.kg,
            amount: Amount::new(row.amount),
        })
    }
}

/// Repository for purchases.
#[derive(Debug, Clone)]
pub struct PurchaseRepository {
    pool: SqlitePool,
}

impl PurchaseRepository {
    /// Creates a new PurchaseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PurchaseRepository { pool }
    }

    /// Stores a purchase.
    pub async fn insert(&self, purchase: &PurchaseRecord) -> DbResult<()> {
        debug!(id = %purchase.id, kg = purchase.kg, "Inserting purchase");

        let customer = purchase.customer.as_ref().map(to_json).transpose()?;

        sqlx::query(
            r#"
            INSERT INTO purchases (id, date, customer, product_type, kg, amount, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&purchase.id)
        .bind(&purchase.date)
        .bind(customer)
        .bind(&purchase.product_type)
        .bind(purchase.kg)
        .bind(purchase.amount.value())
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Every purchase in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<PurchaseRecord>> {
        let rows = sqlx::query_as::<_, PurchaseRow>(
            "SELECT id, date, customer, product_type, kg, amount FROM purchases ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(PurchaseRecord::try_from).collect()
    }

    /// One page of purchases, newest first.
    pub async fn list(&self, page: PageRequest) -> DbResult<Page<PurchaseRecord>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM purchases")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, PurchaseRow>(
            r#"
            SELECT id, date, customer, product_type, kg, amount
            FROM purchases
            ORDER BY rowid DESC
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            total: total.max(0) as u64,
            items: rows
                .into_iter()
                .map(PurchaseRecord::try_from)
                .collect::<DbResult<_>>()?,
        })
    }

    /// Deletes a purchase.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM purchases WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Purchase", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    #[tokio::test]
    async fn test_purchase_without_supplier() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let purchase = PurchaseRecord {
            id: "p-1".to_string(),
            date: "2025-01-15".to_string(),
            customer: None,
            product_type: "bottles".to_string(),
            kg: 300.0,
            amount: Amount::new(45_000.0),
        };
        db.purchases().insert(&purchase).await.unwrap();

        assert_eq!(db.purchases().list_all().await.unwrap(), vec![purchase]);
        let page = db.purchases().list(PageRequest::default()).await.unwrap();
        assert_eq!(page.total, 1);

        db.purchases().delete("p-1").await.unwrap();
        assert!(db.purchases().list_all().await.unwrap().is_empty());
    }
}
