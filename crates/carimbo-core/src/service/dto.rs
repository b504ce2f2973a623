//! 服务层数据传输对象

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::{
    Campaign, CampaignChannel, CampaignStatus, CampaignTone, CardDesign, ContentSource,
    EnrollmentStatus, LoyaltyCardRules,
};

/// 发放集点命令
#[derive(Debug, Clone)]
pub struct GrantStampsCommand {
    pub customer_id: Uuid,
    /// 顾客有多张卡时必须指定
    pub loyalty_card_id: Option<Uuid>,
    /// 未校验的原始点数
    pub stamps: i64,
    pub note: Option<String>,
    /// 操作人（商家后台用户）
    pub operator: Option<Uuid>,
}

/// 发放集点结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GrantStampsResult {
    pub ok: bool,
    pub current_stamps: i32,
    pub status: EnrollmentStatus,
    pub total_redeemed: i32,
    /// 本次是否集满
    pub completed_now: bool,
    pub loyalty_card_id: Uuid,
    pub enrollment_id: Uuid,
    pub stamps_applied: i32,
    pub stamps_required: i32,
}

/// 新建顾客命令
#[derive(Debug, Clone, Default)]
pub struct CreateCustomerCommand {
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// 新建集点卡命令
#[derive(Debug, Clone)]
pub struct CreateLoyaltyCardCommand {
    pub name: String,
    pub description: Option<String>,
    pub rules: LoyaltyCardRules,
    pub design: Option<CardDesign>,
}

/// AI 生成活动命令
#[derive(Debug, Clone)]
pub struct GenerateCampaignCommand {
    /// 未指定时用文案标题作为活动名
    pub name: Option<String>,
    pub objective: String,
    pub channel: CampaignChannel,
    pub audience: Option<String>,
    pub tone: CampaignTone,
}

/// 手动创建活动命令
#[derive(Debug, Clone)]
pub struct CreateCampaignCommand {
    pub name: String,
    pub objective: String,
    pub channel: CampaignChannel,
    pub audience: Option<String>,
    pub tone: CampaignTone,
    pub title: String,
    pub message: String,
    pub call_to_action: String,
    pub status: CampaignStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
}

/// AI 生成活动结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeneratedCampaign {
    pub campaign: Campaign,
    pub content_source: ContentSource,
    /// 降级为兜底文案时的原因
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fallback_reason: Option<String>,
}
