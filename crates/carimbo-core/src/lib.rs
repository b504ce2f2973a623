//! 集点卡核心库
//!
//! 餐厅会员集点的领域逻辑与持久化。
//!
//! ## 核心功能
//!
//! - **集点计算**：`apply_stamps` 纯函数，封顶、集满判定、兑换计数只加一次
//! - **选卡策略**：顾客持有多张卡且未指定时拒绝发放，不做任何写入
//! - **集点发放**：行锁事务内完成校验、计算、写回与流水记录
//! - **营销文案**：AI 生成，失败时显式降级为兜底文案
//! - **电子卡券**：外部卡券服务 + 后台重试队列
//!
//! ## 模块结构
//!
//! - `models`: 领域模型定义
//! - `accrual`: 集点计算、选卡、每日上限
//! - `error`: 错误类型定义
//! - `repository`: 数据库仓储层
//! - `service`: 业务服务层
//! - `content`: 营销文案生成
//! - `wallet`: 电子卡券

pub mod accrual;
pub mod content;
pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod wallet;

#[cfg(test)]
mod test_fixtures;

pub use accrual::{AccrualOutcome, EnrollmentProgress, StampIncrement, apply_stamps};
pub use content::{ContentGenerator, GeneratedContent, LlmContentGenerator};
pub use error::{LoyaltyError, Result};
pub use models::*;
pub use repository::{
    BusinessRepository, CampaignRepository, CustomerRepository, EnrollmentRepository,
    LoyaltyCardRepository, StampTransactionRepository,
};
pub use service::{
    BusinessService, CampaignService, CustomerService, EnrollmentService, LoyaltyCardService,
    StampService, WalletPassService, dto,
};
pub use wallet::{HttpWalletPassProvider, WalletPassProvider, WalletRetryQueue};
