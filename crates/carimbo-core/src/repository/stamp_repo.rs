//! 集点流水仓储

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::StampTransactionRepositoryTrait;
use crate::error::Result;
use crate::models::StampTransaction;

pub struct StampTransactionRepository {
    pool: PgPool,
}

impl StampTransactionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl StampTransactionRepositoryTrait for StampTransactionRepository {
    async fn list_for_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<StampTransaction>, i64)> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM stamp_transactions WHERE business_id = $1 AND customer_id = $2",
        )
        .bind(business_id)
        .bind(customer_id)
        .fetch_one(&self.pool)
        .await?;

        let items = sqlx::query_as::<_, StampTransaction>(
            r#"
            SELECT id, business_id, enrollment_id, customer_id, loyalty_card_id,
                   stamps_requested, stamps_applied, stamps_after, completed, note,
                   created_by, created_at
            FROM stamp_transactions
            WHERE business_id = $1 AND customer_id = $2
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
        )
        .bind(business_id)
        .bind(customer_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await?;

        Ok((items, total))
    }
}
