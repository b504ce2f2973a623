//! 商家后台用户

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::enums::MerchantUserStatus;

/// 商家后台用户
///
/// password_hash 不参与序列化
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct MerchantUser {
    pub id: Uuid,
    pub business_id: Uuid,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    #[sqlx(default)]
    pub display_name: Option<String>,
    pub status: MerchantUserStatus,
    #[sqlx(default)]
    pub last_login_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl MerchantUser {
    pub fn is_active(&self) -> bool {
        self.status == MerchantUserStatus::Active
    }
}
