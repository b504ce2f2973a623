//! 集点流水实体定义

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 集点流水
///
/// 每次发放集点追加一条，仅追加不修改，用于审计与每日上限统计
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct StampTransaction {
    pub id: Uuid,
    pub business_id: Uuid,
    pub enrollment_id: Uuid,
    pub customer_id: Uuid,
    pub loyalty_card_id: Uuid,
    /// 请求发放的点数
    pub stamps_requested: i32,
    /// 实际计入的点数（集满封顶后可能小于请求值）
    pub stamps_applied: i32,
    /// 发放后的点数
    pub stamps_after: i32,
    /// 本次是否触发集满
    pub completed: bool,
    #[sqlx(default)]
    pub note: Option<String>,
    /// 操作人（商家后台用户 ID）
    #[sqlx(default)]
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}
