//! # Invoice Repository
//!
//! Processing invoices and their status machine.
//!
//! ## Invoice Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. CREATE                                                             │
//! │     └── create(NewInvoice) → InvoiceRecord { status: in progress }     │
//! │         (any status on the input is ignored)                           │
//! │                                                                         │
//! │  2. WORK                                                               │
//! │     └── update_status(id, Stopped)    → paused                         │
//! │     └── update_status(id, InProgress) → resumed                        │
//! │                                                                         │
//! │  3. FINISH                                                             │
//! │     └── update_status(id, Completed)  → counts towards revenue         │
//! │                                                                         │
//! │  Nothing leaves `completed`; the check and the write share one         │
//! │  transaction.                                                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use sqlx::SqlitePool;
use tracing::{debug, warn};

use crate::error::{DbError, DbResult};
use crate::repository::{from_json, now_timestamp, to_json};
use downtown_core::validation::validate_new_invoice;
use downtown_core::{
    new_record_id, Amount, CoreError, CustomerRef, InvoiceRecord, InvoiceStatus, NewInvoice, Page,
    PageRequest, ProcessCode,
};

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: String,
    customer: String,
    product_type: String,
    process_type: String,
    kg_in: f64,
    kg_out: f64,
    amount: f64,
    status: InvoiceStatus,
    recycler: Option<String>,
    date: String,
}

impl TryFrom<InvoiceRow> for InvoiceRecord {
    type Error = DbError;

    fn try_from(row: InvoiceRow) -> DbResult<Self> {
        let customer: CustomerRef = from_json(&row.customer)?;
        let process_type: Vec<ProcessCode> = from_json(&row.process_type)?;
        Ok(InvoiceRecord {
            id: row.id,
            customer,
            product_type: row.product_type,
            process_type,
            kg_in: row.kg_in,
            kg_out: row.kg_out,
            amount: Amount::new(row.amount),
            status: row.status,
            recycler: row.recycler,
            date: row.date,
        })
    }
}

fn collect(rows: Vec<InvoiceRow>) -> DbResult<Vec<InvoiceRecord>> {
    rows.into_iter().map(InvoiceRecord::try_from).collect()
}

const SELECT_COLUMNS: &str = r#"
    SELECT id, customer, product_type, process_type, kg_in, kg_out, amount, status, recycler, date
    FROM invoices
"#;

/// Repository for invoice operations.
#[derive(Debug, Clone)]
pub struct InvoiceRepository {
    pool: SqlitePool,
}

impl InvoiceRepository {
    /// Creates a new InvoiceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        InvoiceRepository { pool }
    }

    /// Creates an invoice. The stored status is always `in progress`.
    ///
    /// ## Errors
    /// `Rejected(Validation)` for a blank customer or product, no process
    /// steps, negative kg or amount, a bad date, or an unknown recycler.
    pub async fn create(&self, invoice: NewInvoice) -> DbResult<InvoiceRecord> {
        validate_new_invoice(&invoice).map_err(CoreError::from)?;

        let record = invoice.into_record(new_record_id());
        let now = now_timestamp();

        debug!(id = %record.id, customer = %record.customer.name, "Creating invoice");

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, customer, product_type, process_type,
                kg_in, kg_out, amount, status, recycler, date,
                created_at, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)
            "#,
        )
        .bind(&record.id)
        .bind(to_json(&record.customer)?)
        .bind(&record.product_type)
        .bind(to_json(&record.process_type)?)
        .bind(record.kg_in)
        .bind(record.kg_out)
        .bind(record.amount.value())
        .bind(record.status)
        .bind(&record.recycler)
        .bind(&record.date)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?;

        Ok(record)
    }

    /// Gets an invoice by ID.
    pub async fn get(&self, id: &str) -> DbResult<Option<InvoiceRecord>> {
        let row = sqlx::query_as::<_, InvoiceRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(InvoiceRecord::try_from).transpose()
    }

    /// Every invoice regardless of status.
    pub async fn list_all(&self) -> DbResult<Vec<InvoiceRecord>> {
        let rows = sqlx::query_as::<_, InvoiceRow>(&format!("{SELECT_COLUMNS} ORDER BY rowid"))
            .fetch_all(&self.pool)
            .await?;

        collect(rows)
    }

    /// One page of all invoices, newest first.
    pub async fn list(&self, page: PageRequest) -> DbResult<Page<InvoiceRecord>> {
        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices")
            .fetch_one(&self.pool)
            .await?;

        let rows = sqlx::query_as::<_, InvoiceRow>(&format!(
            "{SELECT_COLUMNS} ORDER BY rowid DESC LIMIT ?1 OFFSET ?2"
        ))
        .bind(page.limit)
        .bind(page.skip)
        .fetch_all(&self.pool)
        .await?;

        Ok(Page {
            total: total.max(0) as u64,
            items: collect(rows)?,
        })
    }

    /// Invoices still being worked on (`in progress` or `stopped`).
    pub async fn list_open(&self) -> DbResult<Vec<InvoiceRecord>> {
        self.list_with_status(&[InvoiceStatus::InProgress, InvoiceStatus::Stopped])
            .await
    }

    /// Completed invoices.
    pub async fn list_completed(&self) -> DbResult<Vec<InvoiceRecord>> {
        self.list_with_status(&[InvoiceStatus::Completed]).await
    }

    async fn list_with_status(&self, statuses: &[InvoiceStatus]) -> DbResult<Vec<InvoiceRecord>> {
        let placeholders = (1..=statuses.len())
            .map(|i| format!("?{i}"))
            .collect::<Vec<_>>()
            .join(", ");
        let sql = format!("{SELECT_COLUMNS} WHERE status IN ({placeholders}) ORDER BY rowid");

        let mut query = sqlx::query_as::<_, InvoiceRow>(&sql);
        for status in statuses {
            query = query.bind(*status);
        }

        collect(query.fetch_all(&self.pool).await?)
    }

    /// Moves an invoice to `next`.
    ///
    /// ## Errors
    /// - `NotFound` when the invoice does not exist
    /// - `Rejected(InvalidStatusTransition)` when it is already `completed`
    pub async fn update_status(&self, id: &str, next: InvoiceStatus) -> DbResult<InvoiceRecord> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        let row = sqlx::query_as::<_, InvoiceRow>(&format!("{SELECT_COLUMNS} WHERE id = ?1"))
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or_else(|| DbError::not_found("Invoice", id))?;

        let mut record = InvoiceRecord::try_from(row)?;

        if !record.status.can_transition_to(next) {
            warn!(id = %id, from = %record.status, to = %next, "Rejected invoice status change");
            return Err(CoreError::InvalidStatusTransition {
                invoice_id: id.to_string(),
                from: record.status,
                to: next,
            }
            .into());
        }

        sqlx::query("UPDATE invoices SET status = ?2, updated_at = ?3 WHERE id = ?1")
            .bind(id)
            .bind(next)
            .bind(now_timestamp())
            .execute(&mut *tx)
            .await?;

        tx.commit()
            .await
            .map_err(|e| DbError::TransactionFailed(e.to_string()))?;

        debug!(id = %id, from = %record.status, to = %next, "Invoice status updated");
        record.status = next;
        Ok(record)
    }

    /// Deletes an invoice.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        let result = sqlx::query("DELETE FROM invoices WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Invoice", id));
        }
        Ok(())
    }
}
