//! 营销活动实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CampaignChannel, CampaignStatus, CampaignTone, ContentSource};

/// 营销活动
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Campaign {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    /// 活动目标，如 "trazer clientes de volta na terça"
    pub objective: String,
    pub channel: CampaignChannel,
    #[sqlx(default)]
    pub audience: Option<String>,
    pub tone: CampaignTone,
    pub title: String,
    pub message: String,
    pub call_to_action: String,
    pub content_source: ContentSource,
    pub status: CampaignStatus,
    #[sqlx(default)]
    pub scheduled_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建营销活动
#[derive(Debug, Clone)]
pub struct NewCampaign {
    pub business_id: Uuid,
    pub name: String,
    pub objective: String,
    pub channel: CampaignChannel,
    pub audience: Option<String>,
    pub tone: CampaignTone,
    pub title: String,
    pub message: String,
    pub call_to_action: String,
    pub content_source: ContentSource,
    pub status: CampaignStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// 营销活动更新（None 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct CampaignChanges {
    pub name: Option<String>,
    pub objective: Option<String>,
    pub audience: Option<String>,
    pub title: Option<String>,
    pub message: Option<String>,
    pub call_to_action: Option<String>,
    pub status: Option<CampaignStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl CampaignChanges {
    /// 是否修改了文案内容（修改后来源改记为手动）
    pub fn touches_copy(&self) -> bool {
        self.title.is_some() || self.message.is_some() || self.call_to_action.is_some()
    }
}
