//! 顾客实体定义

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// 顾客
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: Uuid,
    pub business_id: Uuid,
    pub name: String,
    /// 规范化后的手机号（仅数字，含 55 国家码）
    #[sqlx(default)]
    pub phone: Option<String>,
    #[sqlx(default)]
    pub email: Option<String>,
    #[sqlx(default)]
    pub birthday: Option<NaiveDate>,
    #[sqlx(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 新建顾客
#[derive(Debug, Clone)]
pub struct NewCustomer {
    pub business_id: Uuid,
    pub name: String,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// 顾客资料更新（None 表示不修改）
#[derive(Debug, Clone, Default)]
pub struct CustomerChanges {
    pub name: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// 规范化巴西手机号
///
/// 去除非数字字符；10-11 位本地号码补全 55 国家码；
/// 已带国家码的 12-13 位号码原样保留。其它长度返回 None。
pub fn normalize_phone(raw: &str) -> Option<String> {
    let digits: String = raw.chars().filter(|c| c.is_ascii_digit()).collect();
    match digits.len() {
        10 | 11 => Some(format!("55{}", digits)),
        12 | 13 if digits.starts_with("55") => Some(digits),
        _ => None,
    }
}
