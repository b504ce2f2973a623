//! 集点卡服务错误类型
//!
//! 定义服务层的业务错误和系统错误

use thiserror::Error;
use uuid::Uuid;

use carimbo_shared::error::PlatformError;

use crate::accrual::{DailyLimitExceeded, SelectionError};
use crate::wallet::WalletError;

/// 集点卡服务错误类型
#[derive(Debug, Error)]
pub enum LoyaltyError {
    // === 参数校验 ===
    #[error("参数校验失败: {0}")]
    Validation(String),

    // === 资源不存在（跨租户访问同样返回不存在） ===
    #[error("商家不存在: {0}")]
    BusinessNotFound(Uuid),

    #[error("顾客不存在: {0}")]
    CustomerNotFound(Uuid),

    #[error("集点卡不存在: {0}")]
    LoyaltyCardNotFound(Uuid),

    #[error("顾客卡片不存在: {0}")]
    EnrollmentNotFound(Uuid),

    #[error("顾客未加入任何集点卡: customer_id={0}")]
    NoEnrollment(Uuid),

    #[error("顾客未加入该集点卡: customer_id={customer_id}, loyalty_card_id={loyalty_card_id}")]
    CardNotEnrolled {
        customer_id: Uuid,
        loyalty_card_id: Uuid,
    },

    #[error("营销活动不存在: {0}")]
    CampaignNotFound(Uuid),

    // === 业务规则 ===
    #[error("顾客有多张集点卡，请指定 loyaltyCardId: 候选 {candidates:?}")]
    AmbiguousCard { candidates: Vec<Uuid> },

    #[error("顾客已加入该集点卡: customer_id={customer_id}, loyalty_card_id={loyalty_card_id}")]
    AlreadyEnrolled {
        customer_id: Uuid,
        loyalty_card_id: Uuid,
    },

    #[error("集点卡已归档: {0}")]
    CardArchived(Uuid),

    #[error("手机号已被其他顾客使用: {0}")]
    DuplicatePhone(String),

    #[error("已达到每日集点上限: 上限 {limit}，今日已集 {granted_today}")]
    DailyLimitExceeded { limit: i32, granted_today: i64 },

    #[error("顾客卡片已过期: {0}")]
    EnrollmentExpired(Uuid),

    #[error("电子卡券功能未启用")]
    WalletDisabled,

    #[error("顾客卡片尚未发放电子卡券: {0}")]
    WalletPassMissing(Uuid),

    // === 外部服务 ===
    #[error("电子卡券服务错误: {0}")]
    Wallet(#[from] WalletError),

    // === 系统错误 ===
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),

    #[error("JSON 序列化错误: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("基础设施错误: {0}")]
    Platform(#[from] PlatformError),

    #[error("内部错误: {0}")]
    Internal(String),
}

/// 集点卡服务 Result 类型别名
pub type Result<T> = std::result::Result<T, LoyaltyError>;

impl LoyaltyError {
    /// 选卡失败转换为业务错误
    pub fn from_selection(customer_id: Uuid, err: SelectionError) -> Self {
        match err {
            SelectionError::NoEnrollment => Self::NoEnrollment(customer_id),
            SelectionError::CardNotEnrolled(loyalty_card_id) => Self::CardNotEnrolled {
                customer_id,
                loyalty_card_id,
            },
            SelectionError::Ambiguous(candidates) => Self::AmbiguousCard { candidates },
        }
    }

    /// 检查是否为可重试的错误
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Database(_) => true,
            Self::Wallet(e) => e.is_retryable(),
            Self::Platform(e) => e.is_retryable(),
            _ => false,
        }
    }

    /// 检查是否为业务错误（非系统错误）
    pub fn is_business_error(&self) -> bool {
        !matches!(
            self,
            Self::Database(_)
                | Self::Serialization(_)
                | Self::Platform(_)
                | Self::Internal(_)
                | Self::Wallet(_)
        )
    }

    /// 是否为资源不存在类错误
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::BusinessNotFound(_)
                | Self::CustomerNotFound(_)
                | Self::LoyaltyCardNotFound(_)
                | Self::EnrollmentNotFound(_)
                | Self::NoEnrollment(_)
                | Self::CardNotEnrolled { .. }
                | Self::CampaignNotFound(_)
                | Self::WalletPassMissing(_)
        )
    }

    /// 获取错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessNotFound(_) => "BUSINESS_NOT_FOUND",
            Self::CustomerNotFound(_) => "CUSTOMER_NOT_FOUND",
            Self::LoyaltyCardNotFound(_) => "LOYALTY_CARD_NOT_FOUND",
            Self::EnrollmentNotFound(_) => "ENROLLMENT_NOT_FOUND",
            Self::NoEnrollment(_) => "NO_ENROLLMENT",
            Self::CardNotEnrolled { .. } => "CARD_NOT_ENROLLED",
            Self::CampaignNotFound(_) => "CAMPAIGN_NOT_FOUND",
            Self::AmbiguousCard { .. } => "AMBIGUOUS_CARD",
            Self::AlreadyEnrolled { .. } => "ALREADY_ENROLLED",
            Self::CardArchived(_) => "CARD_ARCHIVED",
            Self::DuplicatePhone(_) => "DUPLICATE_PHONE",
            Self::DailyLimitExceeded { .. } => "DAILY_LIMIT_EXCEEDED",
            Self::EnrollmentExpired(_) => "ENROLLMENT_EXPIRED",
            Self::WalletDisabled => "WALLET_DISABLED",
            Self::WalletPassMissing(_) => "WALLET_PASS_MISSING",
            Self::Wallet(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
            Self::Serialization(_) => "SERIALIZATION_ERROR",
            Self::Platform(_) => "PLATFORM_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<DailyLimitExceeded> for LoyaltyError {
    fn from(e: DailyLimitExceeded) -> Self {
        Self::DailyLimitExceeded {
            limit: e.limit,
            granted_today: e.granted_today,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_is_retryable() {
        assert!(LoyaltyError::Database(sqlx::Error::PoolTimedOut).is_retryable());
        assert!(LoyaltyError::Wallet(WalletError::Unavailable("502".to_string())).is_retryable());
        assert!(!LoyaltyError::Wallet(WalletError::Rejected("bad color".to_string())).is_retryable());
        assert!(!LoyaltyError::CustomerNotFound(Uuid::nil()).is_retryable());
    }

    #[test]
    fn test_error_is_business_error() {
        assert!(LoyaltyError::AmbiguousCard { candidates: vec![] }.is_business_error());
        assert!(LoyaltyError::Validation("x".to_string()).is_business_error());
        assert!(!LoyaltyError::Internal("boom".to_string()).is_business_error());
        assert!(!LoyaltyError::Database(sqlx::Error::RowNotFound).is_business_error());
    }

    #[test]
    fn test_from_selection() {
        let customer = Uuid::new_v4();
        let card = Uuid::new_v4();

        let err = LoyaltyError::from_selection(customer, SelectionError::Ambiguous(vec![card]));
        assert_eq!(err.error_code(), "AMBIGUOUS_CARD");
        assert!(err.to_string().contains(&card.to_string()));

        let err = LoyaltyError::from_selection(customer, SelectionError::CardNotEnrolled(card));
        assert!(err.is_not_found());

        let err = LoyaltyError::from_selection(customer, SelectionError::NoEnrollment);
        assert_eq!(err.error_code(), "NO_ENROLLMENT");
    }

    #[test]
    fn test_daily_limit_conversion() {
        let err: LoyaltyError = DailyLimitExceeded {
            limit: 2,
            granted_today: 2,
        }
        .into();
        assert_eq!(err.error_code(), "DAILY_LIMIT_EXCEEDED");
        assert!(err.to_string().contains("2"));
    }
}
