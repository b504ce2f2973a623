//! 仓储 Trait 定义
//!
//! 服务层依赖抽象而非具体实现，支持 mock 测试

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::accrual::{AccrualOutcome, StampIncrement};
use crate::error::Result;
use crate::models::{
    Business, BusinessChanges, Campaign, CampaignChanges, CampaignStatus, Customer,
    CustomerChanges, Enrollment, EnrollmentView, LoyaltyCard, LoyaltyCardChanges, NewCampaign,
    NewCustomer, NewLoyaltyCard, StampTransaction,
};

/// 集点写入请求
#[derive(Debug, Clone)]
pub struct AccrualRequest {
    pub business_id: Uuid,
    pub enrollment_id: Uuid,
    pub increment: StampIncrement,
    /// 用于每日上限和有效期判断的当前时间
    pub now: DateTime<Utc>,
    pub note: Option<String>,
    pub created_by: Option<Uuid>,
}

/// 集点写入结果（事务已提交）
#[derive(Debug, Clone)]
pub struct AccrualRecord {
    pub enrollment_id: Uuid,
    pub customer_id: Uuid,
    pub loyalty_card_id: Uuid,
    pub stamps_required: i32,
    pub outcome: AccrualOutcome,
    pub transaction_id: Uuid,
    pub wallet_pass_serial: Option<String>,
}

/// 商家仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait BusinessRepositoryTrait: Send + Sync {
    async fn get(&self, id: Uuid) -> Result<Option<Business>>;
    async fn update(&self, id: Uuid, changes: &BusinessChanges) -> Result<Option<Business>>;
}

/// 顾客仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CustomerRepositoryTrait: Send + Sync {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Customer>>;
    /// search 匹配姓名或手机号
    async fn list(
        &self,
        business_id: Uuid,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Customer>, i64)>;
    async fn create(&self, customer: &NewCustomer) -> Result<Customer>;
    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>>;
    async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<bool>;
}

/// 集点卡仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait LoyaltyCardRepositoryTrait: Send + Sync {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<LoyaltyCard>>;
    async fn list(&self, business_id: Uuid, include_archived: bool) -> Result<Vec<LoyaltyCard>>;
    async fn create(&self, card: &NewLoyaltyCard) -> Result<LoyaltyCard>;
    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: &LoyaltyCardChanges,
    ) -> Result<Option<LoyaltyCard>>;
}

/// 顾客卡片仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnrollmentRepositoryTrait: Send + Sync {
    async fn list_for_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<EnrollmentView>>;
    async fn get_view(&self, business_id: Uuid, id: Uuid) -> Result<Option<EnrollmentView>>;
    /// 以 0 点 / active / 0 次兑换创建；重复加入返回 AlreadyEnrolled
    async fn create(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        loyalty_card_id: Uuid,
    ) -> Result<Enrollment>;
    /// 删除并返回被删除的记录
    async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<Option<Enrollment>>;
    async fn set_wallet_serial(
        &self,
        business_id: Uuid,
        id: Uuid,
        serial: Option<String>,
    ) -> Result<bool>;
    /// 仅在尚无卡券时写入序列号；已被其他请求写入时返回 false
    async fn claim_wallet_serial(&self, business_id: Uuid, id: Uuid, serial: String)
    -> Result<bool>;
    /// 行锁 + 集点计算 + 写回 + 追加流水，单个事务
    async fn accrue(&self, request: &AccrualRequest) -> Result<AccrualRecord>;
}

/// 集点流水仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StampTransactionRepositoryTrait: Send + Sync {
    async fn list_for_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<StampTransaction>, i64)>;
}

/// 营销活动仓储接口
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CampaignRepositoryTrait: Send + Sync {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Campaign>>;
    async fn list(
        &self,
        business_id: Uuid,
        status: Option<CampaignStatus>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Campaign>, i64)>;
    async fn create(&self, campaign: &NewCampaign) -> Result<Campaign>;
    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: &CampaignChanges,
    ) -> Result<Option<Campaign>>;
    async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<bool>;
}
