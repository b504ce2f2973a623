//! 商家仓储

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::BusinessRepositoryTrait;
use crate::error::Result;
use crate::models::{Business, BusinessChanges};

pub struct BusinessRepository {
    pool: PgPool,
}

impl BusinessRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl BusinessRepositoryTrait for BusinessRepository {
    async fn get(&self, id: Uuid) -> Result<Option<Business>> {
        let business = sqlx::query_as::<_, Business>(
            r#"
            SELECT id, name, slug, phone, address, settings, created_at, updated_at
            FROM businesses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }

    async fn update(&self, id: Uuid, changes: &BusinessChanges) -> Result<Option<Business>> {
        let settings = changes
            .settings
            .as_ref()
            .map(serde_json::to_value)
            .transpose()?;

        let business = sqlx::query_as::<_, Business>(
            r#"
            UPDATE businesses
            SET name = COALESCE($2, name),
                phone = COALESCE($3, phone),
                address = COALESCE($4, address),
                settings = COALESCE($5, settings),
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, name, slug, phone, address, settings, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&changes.name)
        .bind(&changes.phone)
        .bind(&changes.address)
        .bind(settings)
        .fetch_optional(&self.pool)
        .await?;

        Ok(business)
    }
}
