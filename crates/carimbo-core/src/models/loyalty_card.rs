//! 集点卡实体定义
//!
//! 规则（rules）和外观（design）以 JSONB 存储，读写时映射为强类型结构，
//! 默认值在 serde default 函数中显式给出。

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::CardStatus;

/// 集点卡
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyCard {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    #[sqlx(default)]
    pub description: Option<String>,
    #[sqlx(json)]
    pub rules: LoyaltyCardRules,
    #[sqlx(json)]
    pub design: CardDesign,
    pub status: CardStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LoyaltyCard {
    pub fn is_archived(&self) -> bool {
        self.status == CardStatus::Archived
    }
}

/// 集点规则
///
/// 在一次集点操作内不可变
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyCardRules {
    /// 集满所需点数，必须大于 0
    pub stamps_required: i32,
    /// 奖励描述，如 "1 café grátis"
    #[serde(default)]
    pub reward_description: String,
    /// 每日最多可集点数，None 表示不限制
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_stamps_per_day: Option<i32>,
    /// 有效天数（自加入之日起），None 表示永久有效
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expiry_days: Option<i32>,
}

/// 有效天数上限（约 100 年）
pub const MAX_EXPIRY_DAYS: i32 = 36_500;

impl LoyaltyCardRules {
    /// 校验规则取值
    pub fn validate(&self) -> Result<(), String> {
        if self.stamps_required <= 0 {
            return Err(format!(
                "stampsRequired 必须大于 0，当前为 {}",
                self.stamps_required
            ));
        }
        if let Some(max) = self.max_stamps_per_day
            && max <= 0
        {
            return Err(format!("maxStampsPerDay 必须大于 0，当前为 {}", max));
        }
        if let Some(days) = self.expiry_days
            && !(1..=MAX_EXPIRY_DAYS).contains(&days)
        {
            return Err(format!(
                "expiryDays 必须在 1 到 {} 之间，当前为 {}",
                MAX_EXPIRY_DAYS, days
            ));
        }
        Ok(())
    }
}

fn default_background_color() -> String {
    "#1F2937".to_string()
}

fn default_foreground_color() -> String {
    "#FFFFFF".to_string()
}

fn default_label_color() -> String {
    "#F59E0B".to_string()
}

fn default_stamp_icon() -> String {
    "coffee".to_string()
}

/// 卡面设计
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardDesign {
    #[serde(default = "default_background_color")]
    pub background_color: String,
    #[serde(default = "default_foreground_color")]
    pub foreground_color: String,
    #[serde(default = "default_label_color")]
    pub label_color: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    #[serde(default = "default_stamp_icon")]
    pub stamp_icon: String,
}

impl Default for CardDesign {
    fn default() -> Self {
        Self {
            background_color: default_background_color(),
            foreground_color: default_foreground_color(),
            label_color: default_label_color(),
            logo_url: None,
            stamp_icon: default_stamp_icon(),
        }
    }
}

/// 新建集点卡
#[derive(Debug, Clone)]
pub struct NewLoyaltyCard {
    pub business_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub rules: LoyaltyCardRules,
    pub design: CardDesign,
}

/// 集点卡更新（None 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct LoyaltyCardChanges {
    pub name: Option<String>,
    pub description: Option<String>,
    pub rules: Option<LoyaltyCardRules>,
    pub design: Option<CardDesign>,
    pub status: Option<CardStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_rules_defaults() {
        let rules: LoyaltyCardRules = serde_json::from_value(json!({ "stampsRequired": 10 })).unwrap();
        assert_eq!(rules.stamps_required, 10);
        assert_eq!(rules.reward_description, "");
        assert!(rules.max_stamps_per_day.is_none());
        assert!(rules.expiry_days.is_none());
        assert!(rules.validate().is_ok());
    }

    #[test]
    fn test_rules_validation() {
        let mut rules = LoyaltyCardRules {
            stamps_required: 0,
            reward_description: "Pizza grátis".to_string(),
            max_stamps_per_day: None,
            expiry_days: None,
        };
        assert!(rules.validate().is_err());

        rules.stamps_required = 8;
        rules.max_stamps_per_day = Some(0);
        assert!(rules.validate().is_err());

        rules.max_stamps_per_day = Some(2);
        rules.expiry_days = Some(-1);
        assert!(rules.validate().is_err());

        rules.expiry_days = Some(90);
        assert!(rules.validate().is_ok());

        rules.expiry_days = Some(MAX_EXPIRY_DAYS);
        assert!(rules.validate().is_ok());

        rules.expiry_days = Some(MAX_EXPIRY_DAYS + 1);
        assert!(rules.validate().is_err());

        rules.expiry_days = Some(i32::MAX);
        assert!(rules.validate().is_err());
    }

    #[test]
    fn test_design_partial_json_gets_defaults() {
        let design: CardDesign =
            serde_json::from_value(json!({ "backgroundColor": "#000000" })).unwrap();
        assert_eq!(design.background_color, "#000000");
        assert_eq!(design.foreground_color, "#FFFFFF");
        assert_eq!(design.label_color, "#F59E0B");
        assert_eq!(design.stamp_icon, "coffee");
        assert!(design.logo_url.is_none());
    }
}
