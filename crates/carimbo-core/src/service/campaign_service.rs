//! 营销活动服务
//!
//! AI 生成的文案先以草稿保存，并记录来源（generated / fallback），
//! 商家编辑文案后来源变为 manual。

use std::sync::Arc;

use tracing::{info, instrument, warn};
use uuid::Uuid;

use super::dto::{CreateCampaignCommand, GenerateCampaignCommand, GeneratedCampaign};
use crate::content::{CampaignBrief, ContentGenerator};
use crate::error::{LoyaltyError, Result};
use crate::models::{
    Campaign, CampaignChanges, CampaignChannel, CampaignStatus, ContentSource, NewCampaign,
};
use crate::repository::{BusinessRepositoryTrait, CampaignRepositoryTrait};

pub struct CampaignService {
    campaigns: Arc<dyn CampaignRepositoryTrait>,
    businesses: Arc<dyn BusinessRepositoryTrait>,
    generator: Arc<dyn ContentGenerator>,
}

fn check_message_length(channel: CampaignChannel, message: &str) -> Result<()> {
    if let Some(limit) = channel.message_limit()
        && message.chars().count() > limit
    {
        return Err(LoyaltyError::Validation(format!(
            "{} 文案不能超过 {} 个字符",
            channel.label(),
            limit
        )));
    }
    Ok(())
}

fn require_text(value: &str, field: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(LoyaltyError::Validation(format!("{} 不能为空", field)));
    }
    Ok(())
}

impl CampaignService {
    pub fn new(
        campaigns: Arc<dyn CampaignRepositoryTrait>,
        businesses: Arc<dyn BusinessRepositoryTrait>,
        generator: Arc<dyn ContentGenerator>,
    ) -> Self {
        Self {
            campaigns,
            businesses,
            generator,
        }
    }

    /// 生成活动文案并保存为草稿
    ///
    /// 生成器失败时仍会保存兜底文案，结果中带上 fallback_reason
    #[instrument(skip(self, command), fields(business_id = %business_id, channel = ?command.channel))]
    pub async fn generate(
        &self,
        business_id: Uuid,
        command: GenerateCampaignCommand,
    ) -> Result<GeneratedCampaign> {
        require_text(&command.objective, "objective")?;

        let business = self
            .businesses
            .get(business_id)
            .await?
            .ok_or(LoyaltyError::BusinessNotFound(business_id))?;

        let brief = CampaignBrief {
            business_name: business.name,
            objective: command.objective.trim().to_string(),
            channel: command.channel,
            audience: command.audience.clone(),
            tone: command.tone,
        };

        let generated = self.generator.generate_campaign(&brief).await;
        let content_source = generated.source();
        let fallback_reason = generated.fallback_reason().map(String::from);
        if let Some(reason) = &fallback_reason {
            warn!(reason = %reason, "文案生成降级为兜底模板");
        }

        let copy = generated.into_content().fit_channel(command.channel);
        let name = command
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| copy.title.clone());

        let campaign = self
            .campaigns
            .create(&NewCampaign {
                business_id,
                name,
                objective: brief.objective,
                channel: brief.channel,
                audience: brief.audience,
                tone: brief.tone,
                title: copy.title,
                message: copy.message,
                call_to_action: copy.call_to_action,
                content_source,
                status: CampaignStatus::Draft,
                scheduled_at: None,
            })
            .await?;

        info!(campaign_id = %campaign.id, source = content_source.as_str(), "活动草稿已生成");
        Ok(GeneratedCampaign {
            campaign,
            content_source,
            fallback_reason,
        })
    }

    /// 手动创建活动
    pub async fn create(&self, business_id: Uuid, command: CreateCampaignCommand) -> Result<Campaign> {
        require_text(&command.name, "name")?;
        require_text(&command.message, "message")?;
        check_message_length(command.channel, &command.message)?;

        self.campaigns
            .create(&NewCampaign {
                business_id,
                name: command.name,
                objective: command.objective,
                channel: command.channel,
                audience: command.audience,
                tone: command.tone,
                title: command.title,
                message: command.message,
                call_to_action: command.call_to_action,
                content_source: ContentSource::Manual,
                status: command.status,
                scheduled_at: command.scheduled_at,
            })
            .await
    }

    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Campaign> {
        self.campaigns
            .get(business_id, id)
            .await?
            .ok_or(LoyaltyError::CampaignNotFound(id))
    }

    pub async fn list(
        &self,
        business_id: Uuid,
        status: Option<CampaignStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Campaign>, i64)> {
        self.campaigns.list(business_id, status, limit, offset).await
    }

    pub async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: CampaignChanges,
    ) -> Result<Campaign> {
        if let Some(message) = &changes.message {
            let current = self.get(business_id, id).await?;
            check_message_length(current.channel, message)?;
        }
        self.campaigns
            .update(business_id, id, &changes)
            .await?
            .ok_or(LoyaltyError::CampaignNotFound(id))
    }

    pub async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<()> {
        if !self.campaigns.delete(business_id, id).await? {
            return Err(LoyaltyError::CampaignNotFound(id));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{CampaignCopy, GeneratedContent, MockContentGenerator};
    use crate::models::CampaignTone;
    use crate::repository::{MockBusinessRepositoryTrait, MockCampaignRepositoryTrait};
    use crate::test_fixtures::business;
    use chrono::Utc;

    fn stored(campaign: &NewCampaign) -> Campaign {
        let now = Utc::now();
        Campaign {
            id: Uuid::new_v4(),
            business_id: campaign.business_id,
            name: campaign.name.clone(),
            objective: campaign.objective.clone(),
            channel: campaign.channel,
            audience: campaign.audience.clone(),
            tone: campaign.tone,
            title: campaign.title.clone(),
            message: campaign.message.clone(),
            call_to_action: campaign.call_to_action.clone(),
            content_source: campaign.content_source,
            status: campaign.status,
            scheduled_at: campaign.scheduled_at,
            created_at: now,
            updated_at: now,
        }
    }

    fn copy() -> CampaignCopy {
        CampaignCopy {
            title: "Terça da pizza".to_string(),
            message: "Toda terça, pizza com borda grátis!".to_string(),
            call_to_action: "Reserve já".to_string(),
        }
    }

    fn command(channel: CampaignChannel) -> GenerateCampaignCommand {
        GenerateCampaignCommand {
            name: None,
            objective: "Aumentar o movimento nas terças".to_string(),
            channel,
            audience: None,
            tone: CampaignTone::Friendly,
        }
    }

    fn service(generator: MockContentGenerator) -> CampaignService {
        let mut businesses = MockBusinessRepositoryTrait::new();
        businesses
            .expect_get()
            .returning(|id| Ok(Some(business(id))));
        let mut campaigns = MockCampaignRepositoryTrait::new();
        campaigns.expect_create().returning(|c| Ok(stored(c)));
        CampaignService::new(Arc::new(campaigns), Arc::new(businesses), Arc::new(generator))
    }

    #[tokio::test]
    async fn test_generate_stores_generated_draft() {
        let mut generator = MockContentGenerator::new();
        generator
            .expect_generate_campaign()
            .withf(|brief| brief.business_name == "Cantina da Nona")
            .returning(|_| GeneratedContent::Generated(copy()));

        let result = service(generator)
            .generate(Uuid::new_v4(), command(CampaignChannel::Whatsapp))
            .await
            .unwrap();

        assert_eq!(result.content_source, ContentSource::Generated);
        assert_eq!(result.fallback_reason, None);
        assert_eq!(result.campaign.status, CampaignStatus::Draft);
        assert_eq!(result.campaign.name, "Terça da pizza");
    }

    #[tokio::test]
    async fn test_generate_marks_fallback() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate_campaign().returning(|_| GeneratedContent::Fallback {
            content: CampaignCopy {
                message: "a".repeat(400),
                ..copy()
            },
            reason: "timeout".to_string(),
        });

        let result = service(generator)
            .generate(Uuid::new_v4(), command(CampaignChannel::Sms))
            .await
            .unwrap();

        assert_eq!(result.content_source, ContentSource::Fallback);
        assert_eq!(result.campaign.content_source, ContentSource::Fallback);
        assert_eq!(result.fallback_reason.as_deref(), Some("timeout"));
        assert_eq!(result.campaign.message.chars().count(), 160);
    }

    #[tokio::test]
    async fn test_generate_unknown_business() {
        let mut generator = MockContentGenerator::new();
        generator.expect_generate_campaign().never();
        let mut businesses = MockBusinessRepositoryTrait::new();
        businesses.expect_get().returning(|_| Ok(None));
        let service = CampaignService::new(
            Arc::new(MockCampaignRepositoryTrait::new()),
            Arc::new(businesses),
            Arc::new(generator),
        );

        let err = service
            .generate(Uuid::new_v4(), command(CampaignChannel::Email))
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::BusinessNotFound(_)));
    }

    #[tokio::test]
    async fn test_manual_create_checks_channel_limit() {
        let service = service(MockContentGenerator::new());
        let err = service
            .create(
                Uuid::new_v4(),
                CreateCampaignCommand {
                    name: "Promo".to_string(),
                    objective: "Divulgar".to_string(),
                    channel: CampaignChannel::Sms,
                    audience: None,
                    tone: CampaignTone::Urgent,
                    title: "Só hoje".to_string(),
                    message: "b".repeat(161),
                    call_to_action: "Corra".to_string(),
                    status: CampaignStatus::Draft,
                    scheduled_at: None,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::Validation(_)));
    }
}
