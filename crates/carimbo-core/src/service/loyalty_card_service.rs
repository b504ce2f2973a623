//! 集点卡服务

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use super::dto::CreateLoyaltyCardCommand;
use crate::error::{LoyaltyError, Result};
use crate::models::{CardStatus, LoyaltyCard, LoyaltyCardChanges, NewLoyaltyCard};
use crate::repository::LoyaltyCardRepositoryTrait;

pub struct LoyaltyCardService {
    cards: Arc<dyn LoyaltyCardRepositoryTrait>,
}

impl LoyaltyCardService {
    pub fn new(cards: Arc<dyn LoyaltyCardRepositoryTrait>) -> Self {
        Self { cards }
    }

    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<LoyaltyCard> {
        self.cards
            .get(business_id, id)
            .await?
            .ok_or(LoyaltyError::LoyaltyCardNotFound(id))
    }

    pub async fn list(&self, business_id: Uuid, include_archived: bool) -> Result<Vec<LoyaltyCard>> {
        self.cards.list(business_id, include_archived).await
    }

    #[instrument(skip(self, command), fields(business_id = %business_id))]
    pub async fn create(
        &self,
        business_id: Uuid,
        command: CreateLoyaltyCardCommand,
    ) -> Result<LoyaltyCard> {
        if command.name.trim().is_empty() {
            return Err(LoyaltyError::Validation("集点卡名称不能为空".to_string()));
        }
        command.rules.validate().map_err(LoyaltyError::Validation)?;

        let card = self
            .cards
            .create(&NewLoyaltyCard {
                business_id,
                name: command.name.trim().to_string(),
                description: command.description,
                rules: command.rules,
                design: command.design.unwrap_or_default(),
            })
            .await?;

        info!(loyalty_card_id = %card.id, "集点卡已创建");
        Ok(card)
    }

    /// 更新集点卡
    ///
    /// 降低 stampsRequired 不会回写已有顾客卡片，下次集点时按新规则封顶
    pub async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: LoyaltyCardChanges,
    ) -> Result<LoyaltyCard> {
        if let Some(rules) = &changes.rules {
            rules.validate().map_err(LoyaltyError::Validation)?;
        }
        self.cards
            .update(business_id, id, &changes)
            .await?
            .ok_or(LoyaltyError::LoyaltyCardNotFound(id))
    }

    /// 归档集点卡：不再接受新顾客，已有进度保留
    #[instrument(skip(self))]
    pub async fn archive(&self, business_id: Uuid, id: Uuid) -> Result<LoyaltyCard> {
        let card = self
            .update(
                business_id,
                id,
                LoyaltyCardChanges {
                    status: Some(CardStatus::Archived),
                    ..Default::default()
                },
            )
            .await?;
        info!(loyalty_card_id = %id, "集点卡已归档");
        Ok(card)
    }
}
