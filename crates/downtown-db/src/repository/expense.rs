//! # Expense Repository

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now_timestamp;
use downtown_core::{Amount, ExpenseCategory, ExpenseRecord, Page, PageRequest};

#[derive(Debug, sqlx::FromRow)]
struct ExpenseRow {
    id: String,
    date: String,
    category: ExpenseCategory,
    description: String,
    amount: f64,
}

impl From<ExpenseRow> for ExpenseRecord {
    fn from(row: ExpenseRow) -> Self {
        ExpenseRecord {
            id: row.id,
            date: row.date,
            category: row.category,
            description: row.description,
            amount: Amount::new(row.amount),
        }
    }
}

/// Repository for business expenses.
#[derive(Debug, Clone)]
pub struct ExpenseRepository {
    pool: SqlitePool,
}

impl ExpenseRepository {
    /// Creates a new ExpenseRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ExpenseRepository { pool }
    }

    /// Stores an expense.
    pub async fn insert(&self, expense: &ExpenseRecord) -> DbResult<()> {
        debug!(id = %expense.id, category = expense.category.as_str(), "Inserting expense");

        sqlx::query(
            r#"
            INSERT INTO expenses (id, date, category, description, amount, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&expense.id)
        .bind(&expense.date)
        .bind(expense.category)
        .bind(&expense.description)
        .bind(expense.amount.value())
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    /// Every expense in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<ExpenseRecord>> {
        let rows = sqlx::query_as::<_, ExpenseRow>(
            "SELECT id, date, category, description, amount FROM expenses ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(ExpenseRecord::from).collect())
    }

    /// One page of expenses, newest first.
    pub async fn list(&self, page: PageRequest) -> DbResult<Page<ExpenseRecord>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM expenses")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, ExpenseRow>(
            r#"
            SELECT id, date, category, description, amount
            FROM expenses
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
            items: rows.into_iter().map(ExpenseRecord::from).collect(),
        })
    }

    /// Deletes an expense.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM expenses WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Expense", id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};

    fn expense(id: &str, category: ExpenseCategory) -> ExpenseRecord {
        ExpenseRecord {
            id: id.to_string(),
            date: "2025-04-02".to_string(),
            category,
            description: "Generator diesel".to_string(),
            amount: Amount::new(12_500.0),
        }
    }

    #[tokio::test]
    async fn test_category_round_trips_through_check_constraint() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        for (i, category) in ExpenseCategory::all().into_iter().enumerate() {
            db.expenses()
                .insert(&expense(&format!("e-{i}"), category))
                .await
                .unwrap();
        }

        let stored = db.expenses().list_all().await.unwrap();
        let categories: Vec<_> = stored.iter().map(|e| e.category).collect();
        assert_eq!(categories, ExpenseCategory::all().to_vec());
    }

    #[tokio::test]
    async fn test_page_and_delete() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        db.expenses()
            .insert(&expense("e-1", ExpenseCategory::Utilities))
            .await
            .unwrap();
        db.expenses()
            .insert(&expense("e-2", ExpenseCategory::Labour))
            .await
            .unwrap();

        let page = db.expenses().list(PageRequest::new(0, 1)).await.unwrap();
        assert_eq!(page.total, 2);
        assert_eq!(page.items[0].id, "e-2");

        db.expenses().delete("e-2").await.unwrap();
        assert!(matches!(
            db.expenses().delete("e-2").await,
            Err(DbError::NotFound { .. })
        ));
    }
}
