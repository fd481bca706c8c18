//! # Price Repository
//!
//! The single price settings row (`id = 1`).

use sqlx::SqlitePool;
use tracing::debug;

use crate::error::DbResult;
use crate::repository::now_timestamp;
use downtown_core::{CompanyPrices, CoreError, LabourPrices, PriceTable};

#[derive(Debug, sqlx::FromRow)]
struct PriceRow {
    company_recycling_kg: f64,
    company_blending_kg: f64,
    company_crushing_kg: f64,
    labour_recycling: f64,
    labour_blending: f64,
    labour_crushing_waste: f64,
    labour_crushing_sack: f64,
}

impl From<PriceRow> for PriceTable {
    fn from(row: PriceRow) -> Self {
        PriceTable {
            company_prices: CompanyPrices {
                recycling_kg: row.company_recycling_kg,
                blending_kg: row.company_blending_kg,
                crushing_kg: row.company_crushing_kg,
            },
            labour_prices: LabourPrices {
                recycling: row.labour_recycling,
                blending: row.labour_blending,
                crushing_waste: row.labour_crushing_waste,
                crushing_sack: row.labour_crushing_sack,
            },
        }
    }
}

/// Repository for the price settings document.
#[derive(Debug, Clone)]
pub struct PriceRepository {
    pool: SqlitePool,
}

impl PriceRepository {
    /// Creates a new PriceRepository.
    pub fn new(pool: SqlitePool) -> Self {
        PriceRepository { pool }
    }

    /// Current price settings, or `None` when they were never saved.
    pub async fn get(&self) -> DbResult<Option<PriceTable>> {
        let row = sqlx::query_as::<_, PriceRow>(
            r#"
            SELECT
                company_recycling_kg, company_blending_kg, company_crushing_kg,
                labour_recycling, labour_blending, labour_crushing_waste, labour_crushing_sack
            FROM price_settings
            WHERE id = 1
            "#,
        )
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(PriceTable::from))
    }

    /// Creates or replaces the price settings.
    ///
    /// ## Errors
    /// `Rejected` when any rate is negative or not finite.
    pub async fn put(&self, prices: &PriceTable) -> DbResult<()> {
        prices.validate().map_err(CoreError::from)?;

        debug!(?prices, "Saving price settings");

        let company = prices.company_prices;
        let labour = prices.labour_prices;

        sqlx::query(
            r#"
            INSERT INTO price_settings (
                id,
                company_recycling_kg, company_blending_kg, company_crushing_kg,
                labour_recycling, labour_blending, labour_crushing_waste, labour_crushing_sack,
                updated_at
            ) VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                company_recycling_kg = excluded.company_recycling_kg,
                company_blending_kg = excluded.company_blending_kg,
                company_crushing_kg = excluded.company_crushing_kg,
                labour_recycling = excluded.labour_recycling,
                labour_blending = excluded.labour_blending,
                labour_crushing_waste = excluded.labour_crushing_waste,
                labour_crushing_sack = excluded.labour_crushing_sack,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(company.recycling_kg)
        .bind(company.blending_kg)
        .bind(company.crushing_kg)
        .bind(labour.recycling)
        .bind(labour.blending)
        .bind(labour.crushing_waste)
        .bind(labour.crushing_sack)
        .bind(now_timestamp())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}
