//! # Sale Repository
//!
//! Direct sales of material. Each sale embeds a customer snapshot.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::{from_json, now_timestamp, to_json};
use downtown_core::{Amount, Page, PageRequest, SalesRecord};

#[derive(Debug, sqlx::FromRow)]
struct SaleRow {
    id: String,
    date: String,
    customer: String,
    product_type: String,
    kg: f64,
    amount: f64,
}

impl TryFrom<SaleRow> for SalesRecord {
    type Error = DbError;

    fn try_from(row: SaleRow) -> DbResult<Self> {
        Ok(SalesRecord {
            id: row.id,
            date: row.date,
            customer: from_json(&row.customer)?,
            product_type: row.product_type,
            kg: row.kg,
            amount: Amount::new(row.amount),
        })
    }
}

/// Repository for direct sales.
#[derive(Debug, Clone)]
pub struct SaleRepository {
    pool: SqlitePool,
}

impl SaleRepository {
    /// Creates a new SaleRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SaleRepository { pool }
    }

    /// Stores a sale.
    pub async fn insert(&self, sale: &SalesRecord) -> DbResult<()> {
        debug!(id = %sale.id, amount = %sale.amount, "Inserting sale");

        sqlx::query(
            r#"
            INSERT INTO sales (id, date, customer, product_type, kg, amount, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)
            "#,
        )
        .bind(&sale.id)
        .bind(&sale.date)
        .bind(to_json(&sale.customer)?)
        .bind(&sale.product_type)
        .bind(sale.kg)
        .bind(sale.amount.value())
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Every sale in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<SalesRecord>> {
        let rows = sqlx::query_as::<_, SaleRow>(
            "SELECT id, date, customer, product_type, kg, amount FROM sales ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(SalesRecord::try_from).collect()
    }

    /// One page of sales, newest first.
    pub async fn list(&self, page: PageRequest) -> DbResult<Page<SalesRecord>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, SaleRow>(
            r#"
            SELECT id, date, customer, product_type, kg, amount
            FROM sales
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
                .map(SalesRecord::try_from)
                .collect::<DbResult<_>>()?,
        })
    }

    /// Deletes a sale.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM sales WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Sale", id));
        }
        Ok(())
    }
}
