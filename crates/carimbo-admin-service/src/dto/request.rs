//! 请求 DTO 定义
//!
//! 所有 REST API 的请求参数和请求体结构，字段使用 camelCase

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

use carimbo_core::dto::{
    CreateCampaignCommand, CreateCustomerCommand, CreateLoyaltyCardCommand,
    GenerateCampaignCommand, GrantStampsCommand,
};
use carimbo_core::{
    BusinessChanges, BusinessSettings, CampaignChanges, CampaignChannel, CampaignStatus,
    CampaignTone, CardDesign, CustomerChanges, LoyaltyCardChanges, LoyaltyCardRules,
};

use crate::error::AdminError;

/// 分页参数
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaginationParams {
    #[serde(default = "default_page")]
    pub page: i64,
    #[serde(default = "default_page_size")]
    pub page_size: i64,
}

fn default_page() -> i64 {
    1
}

fn default_page_size() -> i64 {
    20
}

impl Default for PaginationParams {
    fn default() -> Self {
        Self {
            page: default_page(),
            page_size: default_page_size(),
        }
    }
}

impl PaginationParams {
    /// 数据库查询的 offset
    pub fn offset(&self) -> i64 {
        (self.page.max(1) - 1) * self.limit()
    }

    /// 限制条数（最大100）
    pub fn limit(&self) -> i64 {
        self.page_size.clamp(1, 100)
    }
}

// ---------------------------------------------------------------------------
// 商家
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBusinessRequest {
    #[validate(length(min = 1, max = 120, message = "商家名称长度必须在1-120个字符之间"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub settings: Option<BusinessSettings>,
}

impl From<UpdateBusinessRequest> for BusinessChanges {
    fn from(req: UpdateBusinessRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            address: req.address,
            settings: req.settings,
        }
    }
}

// ---------------------------------------------------------------------------
// 顾客
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCustomerRequest {
    #[validate(length(min = 1, max = 120, message = "顾客姓名长度必须在1-120个字符之间"))]
    pub name: String,
    pub phone: Option<String>,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[validate(length(max = 500, message = "备注不能超过500个字符"))]
    pub notes: Option<String>,
}

impl From<CreateCustomerRequest> for CreateCustomerCommand {
    fn from(req: CreateCustomerRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            email: req.email,
            birthday: req.birthday,
            notes: req.notes,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCustomerRequest {
    #[validate(length(min = 1, max = 120, message = "顾客姓名长度必须在1-120个字符之间"))]
    pub name: Option<String>,
    pub phone: Option<String>,
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: Option<String>,
    pub birthday: Option<NaiveDate>,
    #[validate(length(max = 500, message = "备注不能超过500个字符"))]
    pub notes: Option<String>,
}

impl From<UpdateCustomerRequest> for CustomerChanges {
    fn from(req: UpdateCustomerRequest) -> Self {
        Self {
            name: req.name,
            phone: req.phone,
            email: req.email,
            birthday: req.birthday,
            notes: req.notes,
        }
    }
}

/// 顾客列表查询
///
/// 不使用 `#[serde(flatten)]` 嵌套分页参数，query string 反序列化不支持数值字段展开
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    /// 按姓名或手机号模糊搜索
    pub search: Option<String>,
}

impl CustomerQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page.unwrap_or_else(default_page),
            page_size: self.page_size.unwrap_or_else(default_page_size),
        }
    }
}

// ---------------------------------------------------------------------------
// 集点卡
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateLoyaltyCardRequest {
    #[validate(length(min = 1, max = 100, message = "集点卡名称长度必须在1-100个字符之间"))]
    pub name: String,
    pub description: Option<String>,
    pub rules: LoyaltyCardRules,
    pub design: Option<CardDesign>,
}

impl From<CreateLoyaltyCardRequest> for CreateLoyaltyCardCommand {
    fn from(req: CreateLoyaltyCardRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            rules: req.rules,
            design: req.design,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLoyaltyCardRequest {
    #[validate(length(min = 1, max = 100, message = "集点卡名称长度必须在1-100个字符之间"))]
    pub name: Option<String>,
    pub description: Option<String>,
    pub rules: Option<LoyaltyCardRules>,
    pub design: Option<CardDesign>,
}

impl From<UpdateLoyaltyCardRequest> for LoyaltyCardChanges {
    fn from(req: UpdateLoyaltyCardRequest) -> Self {
        Self {
            name: req.name,
            description: req.description,
            rules: req.rules,
            design: req.design,
            status: None,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyCardQuery {
    #[serde(default)]
    pub include_archived: bool,
}

// ---------------------------------------------------------------------------
// 顾客卡片 / 集点
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollRequest {
    pub loyalty_card_id: Uuid,
}

/// 集点请求
///
/// stamps 按 JSON 数字接收，非整数在这里报校验错误而不是反序列化失败
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GrantStampsRequest {
    pub customer_id: Uuid,
    pub loyalty_card_id: Option<Uuid>,
    pub stamps: serde_json::Number,
    #[validate(length(max = 200, message = "备注不能超过200个字符"))]
    pub note: Option<String>,
}

impl GrantStampsRequest {
    pub fn into_command(self, operator: Uuid) -> Result<GrantStampsCommand, AdminError> {
        let stamps = self
            .stamps
            .as_i64()
            .ok_or_else(|| AdminError::Validation(format!("stamps 必须为整数: {}", self.stamps)))?;

        Ok(GrantStampsCommand {
            customer_id: self.customer_id,
            loyalty_card_id: self.loyalty_card_id,
            stamps,
            note: self.note,
            operator: Some(operator),
        })
    }
}

// ---------------------------------------------------------------------------
// 营销活动
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateCampaignRequest {
    #[validate(length(max = 120, message = "活动名称不能超过120个字符"))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 500, message = "活动目标长度必须在1-500个字符之间"))]
    pub objective: String,
    pub channel: CampaignChannel,
    pub audience: Option<String>,
    #[serde(default)]
    pub tone: CampaignTone,
}

impl From<GenerateCampaignRequest> for GenerateCampaignCommand {
    fn from(req: GenerateCampaignRequest) -> Self {
        Self {
            name: req.name,
            objective: req.objective,
            channel: req.channel,
            audience: req.audience,
            tone: req.tone,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateCampaignRequest {
    #[validate(length(min = 1, max = 120, message = "活动名称长度必须在1-120个字符之间"))]
    pub name: String,
    #[serde(default)]
    pub objective: String,
    pub channel: CampaignChannel,
    pub audience: Option<String>,
    #[serde(default)]
    pub tone: CampaignTone,
    #[validate(length(max = 120, message = "标题不能超过120个字符"))]
    pub title: String,
    #[validate(length(min = 1, message = "文案不能为空"))]
    pub message: String,
    #[serde(default)]
    pub call_to_action: String,
    #[serde(default)]
    pub status: CampaignStatus,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl From<CreateCampaignRequest> for CreateCampaignCommand {
    fn from(req: CreateCampaignRequest) -> Self {
        Self {
            name: req.name,
            objective: req.objective,
            channel: req.channel,
            audience: req.audience,
            tone: req.tone,
            title: req.title,
            message: req.message,
            call_to_action: req.call_to_action,
            status: req.status,
            scheduled_at: req.scheduled_at,
        }
    }
}

#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCampaignRequest {
    #[validate(length(min = 1, max = 120, message = "活动名称长度必须在1-120个字符之间"))]
    pub name: Option<String>,
    pub objective: Option<String>,
    pub audience: Option<String>,
    #[validate(length(max = 120, message = "标题不能超过120个字符"))]
    pub title: Option<String>,
    #[validate(length(min = 1, message = "文案不能为空"))]
    pub message: Option<String>,
    pub call_to_action: Option<String>,
    pub status: Option<CampaignStatus>,
    pub scheduled_at: Option<DateTime<Utc>>,
}

impl From<UpdateCampaignRequest> for CampaignChanges {
    fn from(req: UpdateCampaignRequest) -> Self {
        Self {
            name: req.name,
            objective: req.objective,
            audience: req.audience,
            title: req.title,
            message: req.message,
            call_to_action: req.call_to_action,
            status: req.status,
            scheduled_at: req.scheduled_at,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CampaignQuery {
    pub page: Option<i64>,
    pub page_size: Option<i64>,
    pub status: Option<CampaignStatus>,
}

impl CampaignQuery {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams {
            page: self.page.unwrap_or_else(default_page),
            page_size: self.page_size.unwrap_or_else(default_page_size),
        }
    }
}
