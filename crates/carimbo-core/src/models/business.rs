//! 商家（租户）实体定义

use chrono::{DateTime, FixedOffset, NaiveTime, Offset, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 商家
///
/// 一个商家即一个租户，所有顾客、集点卡、活动数据都按 business_id 隔离
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Business {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    #[sqlx(default)]
    pub phone: Option<String>,
    #[sqlx(default)]
    pub address: Option<String>,
    #[sqlx(json)]
    pub settings: BusinessSettings,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 商家设置（JSONB 存储）
///
/// 缺省值在此显式给出，不依赖调用方兜底
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct BusinessSettings {
    /// 相对 UTC 的分钟偏移，决定“每日”集点上限的自然日边界。默认巴西利亚时间 -03:00
    pub utc_offset_minutes: i32,
    pub locale: String,
    pub currency: String,
}

impl Default for BusinessSettings {
    fn default() -> Self {
        Self {
            utc_offset_minutes: -180,
            locale: "pt-BR".to_string(),
            currency: "BRL".to_string(),
        }
    }
}

impl BusinessSettings {
    /// 商家所在时区
    ///
    /// 偏移量非法（超出 ±24h）时退回 UTC
    pub fn offset(&self) -> FixedOffset {
        self.utc_offset_minutes
            .checked_mul(60)
            .and_then(FixedOffset::east_opt)
            .unwrap_or_else(|| Utc.fix())
    }

    /// 商家本地自然日的起始时刻（UTC 表示）
    pub fn local_day_start(&self, now: DateTime<Utc>) -> DateTime<Utc> {
        let offset = self.offset();
        let local_midnight = now.with_timezone(&offset).date_naive().and_time(NaiveTime::MIN);
        offset
            .from_local_datetime(&local_midnight)
            .single()
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(now)
    }
}

/// 商家资料更新
#[derive(Debug, Clone, Default)]
pub struct BusinessChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub settings: Option<BusinessSettings>,
}
