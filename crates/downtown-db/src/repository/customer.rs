//! # Customer Repository
//!
//! Customers as master data. Sales, purchases and invoices embed a
//! snapshot instead of a foreign key.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now_timestamp;
use downtown_core::{new_record_id, Customer, Page, PageRequest};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    customer_id: Option<String>,
    name: String,
    contact: String,
    address: String,
}

impl From<CustomerRow> for Customer {
    fn from(row: CustomerRow) -> Self {
        Customer {
            id: Some(row.id),
            customer_id: row.customer_id,
            name: row.name,
            contact: row.contact,
            address: row.address,
        }
    }
}

/// Repository for customer operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    /// Creates a new CustomerRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// All customers in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Customer>> {
        let rows = sqlx::query_as::<_, CustomerRow>(
            "SELECT id, customer_id, name, contact, address FROM customers ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Customer::from).collect())
    }

    /// One page of customers.
    pub async fn list(&self, page: PageRequest) -> DbResult<Page<Customer>> {
        let total = self.count().await?;
        let rows = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT id, customer_id, name, contact, address
            FROM customers
            ORDER BY rowid
            LIMIT ?1 OFFSET ?2
            "#,
        )
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            total,
            items: rows.into_iter().map(Customer::from).collect(),
        })
    }

    /// Number of customers.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM customers")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    /// Adds a customer and returns it with its storage id filled in.
    ///
    /// A missing `id` gets a fresh UUID.
    pub async fn insert(&self, customer: &Customer) -> DbResult<Customer> {
        let mut stored = customer.clone();
        let id = stored.id.get_or_insert_with(new_record_id).clone();

        debug!(id = %id, name = %stored.name, "Inserting customer");

        sqlx::query(
            r#"
            INSERT INTO customers (id, customer_id, name, contact, address, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&id)
        .bind(&stored.customer_id)
        .bind(&stored.name)
        .bind(&stored.contact)
        .bind(&stored.address)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(stored)
    }

    /// Removes a customer. Records that embed it are unaffected.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM customers WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Customer", id));
        }
        Ok(())
    }
}
