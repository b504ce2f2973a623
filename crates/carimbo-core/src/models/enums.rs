//! 领域枚举类型定义
//!
//! 所有枚举都支持数据库（sqlx）和 JSON（serde）序列化

use serde::{Deserialize, Serialize};

/// 顾客卡片（集点进度）状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum EnrollmentStatus {
    /// 集点中
    #[default]
    Active,
    /// 已集满，等待兑换奖励
    Completed,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
        }
    }
}

impl std::fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 集点卡状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum CardStatus {
    /// 可发放、可加入
    #[default]
    Active,
    /// 已归档：不可加入新顾客，已有进度保留
    Archived,
}

/// 营销活动投放渠道
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum CampaignChannel {
    #[default]
    Whatsapp,
    Sms,
    Email,
    Instagram,
}

impl CampaignChannel {
    /// 渠道展示名（用于提示词）
    pub fn label(&self) -> &'static str {
        match self {
            Self::Whatsapp => "WhatsApp",
            Self::Sms => "SMS",
            Self::Email => "e-mail",
            Self::Instagram => "Instagram",
        }
    }

    /// 正文长度上限（字符数），None 表示不限制
    pub fn message_limit(&self) -> Option<usize> {
        match self {
            Self::Sms => Some(160),
            Self::Instagram => Some(2200),
            Self::Whatsapp | Self::Email => None,
        }
    }
}

/// 文案语气
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum CampaignTone {
    #[default]
    Friendly,
    Festive,
    Urgent,
    Sophisticated,
}

impl CampaignTone {
    pub fn label(&self) -> &'static str {
        match self {
            Self::Friendly => "amigável e acolhedor",
            Self::Festive => "festivo e animado",
            Self::Urgent => "urgente, com senso de oportunidade",
            Self::Sophisticated => "sofisticado e elegante",
        }
    }
}

/// 营销活动状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum CampaignStatus {
    #[default]
    Draft,
    Scheduled,
    Sent,
}

/// 文案来源：模型生成或兜底模板
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum ContentSource {
    Generated,
    Fallback,
    /// 商家手动编写
    Manual,
}

impl ContentSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Generated => "generated",
            Self::Fallback => "fallback",
            Self::Manual => "manual",
        }
    }
}

/// 商家后台用户状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[serde(rename_all = "lowercase")]
#[sqlx(type_name = "varchar", rename_all = "lowercase")]
pub enum MerchantUserStatus {
    #[default]
    Active,
    Disabled,
}
