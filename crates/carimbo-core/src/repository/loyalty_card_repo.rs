//! 集点卡仓储

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::types::Json;
use uuid::Uuid;

use super::traits::LoyaltyCardRepositoryTrait;
use crate::error::Result;
use crate::models::{CardStatus, LoyaltyCard, LoyaltyCardChanges, NewLoyaltyCard};

const CARD_COLUMNS: &str =
    "id, business_id, name, description, rules, design, status, created_at, updated_at";

pub struct LoyaltyCardRepository {
    pool: PgPool,
}

impl LoyaltyCardRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl LoyaltyCardRepositoryTrait for LoyaltyCardRepository {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<LoyaltyCard>> {
        let sql = format!(
            "SELECT {} FROM loyalty_cards WHERE id = $1 AND business_id = $2",
            CARD_COLUMNS
        );
        let card = sqlx::query_as::<_, LoyaltyCard>(&sql)
            .bind(id)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(card)
    }

    async fn list(&self, business_id: Uuid, include_archived: bool) -> Result<Vec<LoyaltyCard>> {
        let sql = format!(
            r#"
            SELECT {}
            FROM loyalty_cards
            WHERE business_id = $1 AND ($2 OR status = $3)
            ORDER BY created_at DESC
            "#,
            CARD_COLUMNS
        );
        let cards = sqlx::query_as::<_, LoyaltyCard>(&sql)
            .bind(business_id)
            .bind(include_archived)
            .bind(CardStatus::Active)
            .fetch_all(&self.pool)
            .await?;

        Ok(cards)
    }

    async fn create(&self, card: &NewLoyaltyCard) -> Result<LoyaltyCard> {
        let sql = format!(
            r#"
            INSERT INTO loyalty_cards (id, business_id, name, description, rules, design, status)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            CARD_COLUMNS
        );
        let created = sqlx::query_as::<_, LoyaltyCard>(&sql)
            .bind(Uuid::now_v7())
            .bind(card.business_id)
            .bind(&card.name)
            .bind(&card.description)
            .bind(Json(&card.rules))
            .bind(Json(&card.design))
            .bind(CardStatus::Active)
            .fetch_one(&self.pool)
            .await?;

        Ok(created)
    }

    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: &LoyaltyCardChanges,
    ) -> Result<Option<LoyaltyCard>> {
        let sql = format!(
            r#"
            UPDATE loyalty_cards
            SET name = COALESCE($3, name),
                description = COALESCE($4, description),
                rules = COALESCE($5, rules),
                design = COALESCE($6, design),
                status = COALESCE($7, status),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {}
            "#,
            CARD_COLUMNS
        );
        let updated = sqlx::query_as::<_, LoyaltyCard>(&sql)
            .bind(id)
            .bind(business_id)
            .bind(&changes.name)
            .bind(&changes.description)
            .bind(changes.rules.as_ref().map(Json))
            .bind(changes.design.as_ref().map(Json))
            .bind(changes.status)
            .fetch_optional(&self.pool)
            .await?;

        Ok(updated)
    }
}
