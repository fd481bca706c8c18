//! Price settings access.

use tracing::info;

use downtown_core::PriceTable;
use downtown_db::Database;

use crate::error::ReportResult;

#[derive(Debug, Clone)]
pub struct PriceService {
    db: Database,
}

impl PriceService {
    pub fn new(db: Database) -> Self {
        PriceService { db }
    }

    /// Current prices. A database with no price document is `NOT_FOUND`.
    pub async fn get(&self) -> ReportResult<PriceTable> {
        let prices = self.db.prices().get().await?;
        Ok(*PriceTable::require(prices.as_ref())?)
    }

    /// Replaces the price settings.
    pub async fn put(&self, prices: &PriceTable) -> ReportResult<()> {
        self.db.prices().put(prices).await?;
        info!(
            recycling = prices.labour_prices.recycling,
            blending = prices.labour_prices.blending,
            crushing_waste = prices.labour_prices.crushing_waste,
            crushing_sack = prices.labour_prices.crushing_sack,
            "Labour prices updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use crate::services::fixtures;

    #[tokio::test]
    async fn test_missing_prices() {
        let db = fixtures::database().await;
        let err = PriceService::new(db).get().await.unwrap_err();
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Labour prices not found");
    }

    #[tokio::test]
    async fn test_put_then_get() {
        let db = fixtures::database().await;
        let service = PriceService::new(db);
        service.put(&fixtures::prices()).await.unwrap();
        assert_eq!(service.get().await.unwrap(), fixtures::prices());
    }

    #[tokio::test]
    async fn test_negative_rate_is_validation_error() {
        let db = fixtures::database().await;
        let mut prices = fixtures::prices();
        prices.labour_prices.blending = -3.0;
        let err = PriceService::new(db).put(&prices).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::ValidationError);
    }
}
