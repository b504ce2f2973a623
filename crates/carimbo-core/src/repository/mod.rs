//! 数据库仓储层
//!
//! - 仓储只负责数据持久化，不包含业务规则（集点计算在 `accrual` 中）
//! - 所有查询都带 business_id 条件，跨租户访问表现为记录不存在
//! - 定义 trait 接口以支持 mock 测试

mod business_repo;
mod campaign_repo;
mod customer_repo;
mod enrollment_repo;
mod loyalty_card_repo;
mod stamp_repo;
mod traits;

pub use business_repo::BusinessRepository;
pub use campaign_repo::CampaignRepository;
pub use customer_repo::CustomerRepository;
pub use enrollment_repo::EnrollmentRepository;
pub use loyalty_card_repo::LoyaltyCardRepository;
pub use stamp_repo::StampTransactionRepository;
pub use traits::*;

/// 是否为唯一约束冲突
pub(crate) fn is_unique_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.is_unique_violation())
}
