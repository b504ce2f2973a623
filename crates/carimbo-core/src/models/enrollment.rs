//! 顾客卡片（集点进度）实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::{CardStatus, EnrollmentStatus};
use super::loyalty_card::{CardDesign, LoyaltyCardRules};
use crate::accrual::{EnrollmentProgress, enrollment_expires_at};

/// 顾客与集点卡的关联（customer_cards 表）
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_id: Uuid,
    pub loyalty_card_id: Uuid,
    pub current_stamps: i32,
    pub status: EnrollmentStatus,
    pub total_redeemed: i32,
    /// 电子卡券序列号，未发卡时为空
    #[sqlx(default)]
    pub wallet_pass_serial: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Enrollment {
    pub fn progress(&self) -> EnrollmentProgress {
        EnrollmentProgress {
            current_stamps: self.current_stamps,
            status: self.status,
            total_redeemed: self.total_redeemed,
        }
    }
}

/// 顾客卡片视图：关联集点卡名称、规则与卡面
///
/// 用于列表展示、选卡和生成电子卡券，整体缓存到 Redis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentView {
    pub id: Uuid,
    pub business_id: Uuid,
    pub customer_id: Uuid,
    pub loyalty_card_id: Uuid,
    pub card_name: String,
    pub card_status: CardStatus,
    #[sqlx(json)]
    pub rules: LoyaltyCardRules,
    #[sqlx(json)]
    pub design: CardDesign,
    pub current_stamps: i32,
    pub status: EnrollmentStatus,
    pub total_redeemed: i32,
    #[sqlx(default)]
    pub wallet_pass_serial: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl EnrollmentView {
    pub fn progress(&self) -> EnrollmentProgress {
        EnrollmentProgress {
            current_stamps: self.current_stamps,
            status: self.status,
            total_redeemed: self.total_redeemed,
        }
    }

    /// 过期时间（规则未设置有效期时为 None）
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        enrollment_expires_at(self.created_at, self.rules.expiry_days)
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|t| now >= t)
    }

    /// 进度文本，如 "7/10"
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.current_stamps, self.rules.stamps_required)
    }
}
