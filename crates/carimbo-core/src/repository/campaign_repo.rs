//! 营销活动仓储

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::traits::CampaignRepositoryTrait;
use crate::error::Result;
use crate::models::{Campaign, CampaignChanges, CampaignStatus, ContentSource, NewCampaign};

const CAMPAIGN_COLUMNS: &str = "id, business_id, name, objective, channel, audience, tone, title, \
     message, call_to_action, content_source, status, scheduled_at, created_at, updated_at";

pub struct CampaignRepository {
    pool: PgPool,
}

impl CampaignRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CampaignRepositoryTrait for CampaignRepository {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Campaign>> {
        let sql = format!(
            "SELECT {} FROM campaigns WHERE id = $1 AND business_id = $2",
            CAMPAIGN_COLUMNS
        );
        let campaign = sqlx::query_as::<_, Campaign>(&sql)
            .bind(id)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(campaign)
    }

    async fn list(
        &self,
        business_id: Uuid,
        status: Option<CampaignStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Campaign>, i64)> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*) FROM campaigns
            WHERE business_id = $1 AND ($2::VARCHAR IS NULL OR status = $2)
            "#,
        )
        .bind(business_id)
        .bind(status)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM campaigns
            WHERE business_id = $1 AND ($2::VARCHAR IS NULL OR status = $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            CAMPAIGN_COLUMNS
        );
        let items = sqlx::query_as::<_, Campaign>(&sql)
            .bind(business_id)
            .bind(status)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((items, total))
    }

    async fn create(&self, campaign: &NewCampaign) -> Result<Campaign> {
        let sql = format!(
            r#"
            INSERT INTO campaigns
                (id, business_id, name, objective, channel, audience, tone, title, message,
                 call_to_action, content_source, status, scheduled_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13)
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        );
        let created = sqlx::query_as::<_, Campaign>(&sql)
            .bind(Uuid::now_v7())
            .bind(campaign.business_id)
            .bind(&campaign.name)
            .bind(&campaign.objective)
            .bind(campaign.channel)
            .bind(&campaign.audience)
            .bind(campaign.tone)
            .bind(&campaign.title)
            .bind(&campaign.message)
            .bind(&campaign.call_to_action)
            .bind(campaign.content_source)
            .bind(campaign.status)
            .bind(campaign.scheduled_at)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: &CampaignChanges,
    ) -> Result<Option<Campaign>> {
        // 手动改过文案后来源记为 manual
        let content_source = changes.touches_copy().then_some(ContentSource::Manual);

        let sql = format!(
            r#"
            UPDATE campaigns
            SET name = COALESCE($3, name),
                objective = COALESCE($4, objective),
                audience = COALESCE($5, audience),
                title = COALESCE($6, title),
                message = COALESCE($7, message),
                call_to_action = COALESCE($8, call_to_action),
                status = COALESCE($9, status),
                scheduled_at = COALESCE($10, scheduled_at),
                content_source = COALESCE($11, content_source),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {}
            "#,
            CAMPAIGN_COLUMNS
        );
        let updated = sqlx::query_as::<_, Campaign>(&sql)
            .bind(id)
            .bind(business_id)
            .bind(&changes.name)
            .bind(&changes.objective)
            .bind(&changes.audience)
            .bind(&changes.title)
            .bind(&changes.message)
            .bind(&changes.call_to_action)
            .bind(changes.status)
            .bind(changes.scheduled_at)
            .bind(content_source)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }

    async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM campaigns WHERE id = $1 AND business_id = $2")
            .bind(id)
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
