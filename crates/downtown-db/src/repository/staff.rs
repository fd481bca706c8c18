//! # Staff Repository
//!
//! The roster. Listing order is insertion order, which is also the order
//! monthly wage summaries are emitted in.

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::repository::now_timestamp;
use downtown_core::validation::{validate_name, validate_staff_code};
use downtown_core::{CoreError, Page, PageRequest, Staff};

#[derive(Debug, sqlx::FromRow)]
struct StaffRow {
    id: String,
    staff_id: Option<i64>,
    name: String,
    phone: String,
    date_added: String,
}

impl From<StaffRow> for Staff {
    fn from(row: StaffRow) -> Self {
        Staff {
            id: row.id,
            staff_id: row.staff_id.and_then(|code| u32::try_from(code).ok()),
            name: row.name,
            phone: row.phone,
            date_added: row.date_added,
        }
    }
}

fn check(staff: &Staff) -> DbResult<()> {
    validate_name("name", &staff.name).map_err(CoreError::from)?;
    if let Some(code) = staff.staff_id {
        validate_staff_code(code).map_err(CoreError::from)?;
    }
    Ok(())
}

/// Repository for staff roster operations.
#[derive(Debug, Clone)]
pub struct StaffRepository {
    pool: SqlitePool,
}

impl StaffRepository {
    /// Creates a new StaffRepository.
    pub fn new(pool: SqlitePool) -> Self {
        StaffRepository { pool }
    }

    /// Gets a staff member by ID.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Staff>> {
        let row = sqlx::query_as::<_, StaffRow>(
            "SELECT id, staff_id, name, phone, date_added FROM staff WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Staff::from))
    }

    /// The whole roster in insertion order.
    pub async fn list_all(&self) -> DbResult<Vec<Staff>> {
        let rows = sqlx::query_as::<_, StaffRow>(
            "SELECT id, staff_id, name, phone, date_added FROM staff ORDER BY rowid",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Staff::from).collect())
    }

    /// One page of the roster.
    pub async fn list(&self, page: PageRequest) -> DbResult<Page<Staff>> {
        let total = self.count().await?;
        let rows = sqlx::query_as::<_, StaffRow>(
            r#"
            SELECT id, staff_id, name, phone, date_added
            FROM staff
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
            items: rows.into_iter().map(Staff::from).collect(),
        })
    }

    /// Number of staff on the roster.
    pub async fn count(&self) -> DbResult<u64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM staff")
            .fetch_one(&self.pool)
            .await?;
        Ok(count.max(0) as u64)
    }

    /// Adds a staff member.
    ///
    /// ## Errors
    /// - `Rejected(Validation)` for a blank name or a code that is not six digits
    /// - `UniqueViolation` when the six-digit staff code is already taken
    pub async fn insert(&self, staff: &Staff) -> DbResult<()> {
        check(staff)?;
        debug!(id = %staff.id, name = %staff.name, "Inserting staff");

        sqlx::query(
            r#"
            INSERT INTO staff (id, staff_id, name, phone, date_added, created_at)
            VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            "#,
        )
        .bind(&staff.id)
        .bind(staff.staff_id)
        .bind(&staff.name)
        .bind(&staff.phone)
        .bind(&staff.date_added)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::UniqueViolation {
                field,
                value: staff.staff_id.map(|c| c.to_string()).unwrap_or_default(),
            },
            other => other,
        })?;

        Ok(())
    }

    /// Updates name, phone and staff code. Existing labour records keep the
    /// snapshot they were written with.
    pub async fn update(&self, staff: &Staff) -> DbResult<()> {
        check(staff)?;
        debug!(id = %staff.id, "Updating staff");

        let result = sqlx::query(
            "UPDATE staff SET staff_id = ?2, name = ?3, phone = ?4, date_added = ?5 WHERE id = ?1",
        )
        .bind(&staff.id)
        .bind(staff.staff_id)
        .bind(&staff.name)
        .bind(&staff.phone)
        .bind(&staff.date_added)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Staff", &staff.id));
        }
        Ok(())
    }

    /// Removes a staff member from the roster.
    pub async fn delete(&self, id: &str) -> DbResult<()> {
        debug!(id = %id, "Deleting staff");

        let result = sqlx::query("DELETE FROM staff WHERE id = ?1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Staff", id));
        }
        Ok(())
    }
}
