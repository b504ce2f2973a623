//! 商家后台错误类型定义
//!
//! 领域错误（LoyaltyError）在这里统一映射为 HTTP 状态码和响应体

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use carimbo_core::LoyaltyError;
use carimbo_core::wallet::WalletError;

/// 商家后台错误类型
#[derive(Debug, thiserror::Error)]
pub enum AdminError {
    // 认证错误
    #[error("未授权: {0}")]
    Unauthorized(String),
    #[error("邮箱或密码错误")]
    InvalidCredentials,
    #[error("账号已被禁用")]
    UserDisabled,

    // 验证错误
    #[error("参数验证失败: {0}")]
    Validation(String),

    // 领域错误
    #[error(transparent)]
    Loyalty(#[from] LoyaltyError),

    // 系统错误
    #[error("数据库错误: {0}")]
    Database(#[from] sqlx::Error),
    #[error("内部错误: {0}")]
    Internal(String),
}

fn loyalty_status(err: &LoyaltyError) -> StatusCode {
    match err {
        LoyaltyError::Validation(_) | LoyaltyError::AmbiguousCard { .. } => {
            StatusCode::BAD_REQUEST
        }
        e if e.is_not_found() => StatusCode::NOT_FOUND,
        LoyaltyError::AlreadyEnrolled { .. }
        | LoyaltyError::CardArchived(_)
        | LoyaltyError::DuplicatePhone(_) => StatusCode::CONFLICT,
        LoyaltyError::EnrollmentExpired(_) => StatusCode::UNPROCESSABLE_ENTITY,
        LoyaltyError::DailyLimitExceeded { .. } => StatusCode::TOO_MANY_REQUESTS,
        LoyaltyError::WalletDisabled => StatusCode::SERVICE_UNAVAILABLE,
        LoyaltyError::Wallet(e) => match e {
            WalletError::NotFound(_) => StatusCode::NOT_FOUND,
            WalletError::Rejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            WalletError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            WalletError::Transport(_) => StatusCode::BAD_GATEWAY,
        },
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl AdminError {
    /// 返回对应的 HTTP 状态码
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Unauthorized(_) | Self::InvalidCredentials => StatusCode::UNAUTHORIZED,
            Self::UserDisabled => StatusCode::FORBIDDEN,
            Self::Validation(_) => StatusCode::BAD_REQUEST,
            Self::Loyalty(e) => loyalty_status(e),
            Self::Database(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 返回错误码（用于 API 响应）
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthorized(_) => "UNAUTHORIZED",
            Self::InvalidCredentials => "INVALID_CREDENTIALS",
            Self::UserDisabled => "USER_DISABLED",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::Loyalty(e) => e.error_code(),
            Self::Database(_) => "DATABASE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// 附加在响应 data 中的结构化信息
    fn details(&self) -> serde_json::Value {
        match self {
            Self::Loyalty(LoyaltyError::AmbiguousCard { candidates }) => {
                json!({ "candidates": candidates })
            }
            Self::Loyalty(LoyaltyError::DailyLimitExceeded {
                limit,
                granted_today,
            }) => json!({ "limit": limit, "grantedToday": granted_today }),
            _ => serde_json::Value::Null,
        }
    }
}

impl IntoResponse for AdminError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        // 系统级错误只返回通用提示，详细信息仅记录日志
        let message = if status == StatusCode::INTERNAL_SERVER_ERROR {
            tracing::error!(error = %self, code = self.error_code(), "请求处理失败");
            "服务内部错误，请稍后重试".to_string()
        } else {
            if status.is_server_error() {
                tracing::warn!(error = %self, "外部服务错误");
            }
            self.to_string()
        };

        let body = json!({
            "success": false,
            "code": self.error_code(),
            "message": message,
            "data": self.details()
        });

        (status, axum::Json(body)).into_response()
    }
}

/// 从 validator 错误转换
impl From<validator::ValidationErrors> for AdminError {
    fn from(errors: validator::ValidationErrors) -> Self {
        Self::Validation(errors.to_string())
    }
}

/// 处理器 Result 类型别名
pub type Result<T> = std::result::Result<T, AdminError>;

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn all_error_variants() -> Vec<(AdminError, StatusCode, &'static str)> {
        let id = Uuid::nil();
        vec![
            (AdminError::Unauthorized("token expired".into()), StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
            (AdminError::InvalidCredentials, StatusCode::UNAUTHORIZED, "INVALID_CREDENTIALS"),
            (AdminError::UserDisabled, StatusCode::FORBIDDEN, "USER_DISABLED"),
            (AdminError::Validation("name".into()), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (LoyaltyError::Validation("stamps".into()).into(), StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
            (
                LoyaltyError::AmbiguousCard { candidates: vec![id] }.into(),
                StatusCode::BAD_REQUEST,
                "AMBIGUOUS_CARD",
            ),
            (LoyaltyError::CustomerNotFound(id).into(), StatusCode::NOT_FOUND, "CUSTOMER_NOT_FOUND"),
            (LoyaltyError::NoEnrollment(id).into(), StatusCode::NOT_FOUND, "NO_ENROLLMENT"),
            (LoyaltyError::WalletPassMissing(id).into(), StatusCode::NOT_FOUND, "WALLET_PASS_MISSING"),
            (
                LoyaltyError::AlreadyEnrolled { customer_id: id, loyalty_card_id: id }.into(),
                StatusCode::CONFLICT,
                "ALREADY_ENROLLED",
            ),
            (LoyaltyError::DuplicatePhone("5511".into()).into(), StatusCode::CONFLICT, "DUPLICATE_PHONE"),
            (LoyaltyError::EnrollmentExpired(id).into(), StatusCode::UNPROCESSABLE_ENTITY, "ENROLLMENT_EXPIRED"),
            (
                LoyaltyError::DailyLimitExceeded { limit: 2, granted_today: 2 }.into(),
                StatusCode::TOO_MANY_REQUESTS,
                "DAILY_LIMIT_EXCEEDED",
            ),
            (LoyaltyError::WalletDisabled.into(), StatusCode::SERVICE_UNAVAILABLE, "WALLET_DISABLED"),
            (
                LoyaltyError::Wallet(WalletError::Rejected("color".into())).into(),
                StatusCode::UNPROCESSABLE_ENTITY,
                "WALLET_REJECTED",
            ),
            (
                LoyaltyError::Wallet(WalletError::Transport("reset".into())).into(),
                StatusCode::BAD_GATEWAY,
                "WALLET_TRANSPORT_ERROR",
            ),
            (LoyaltyError::Internal("boom".into()).into(), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
            (AdminError::Internal("oops".into()), StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR"),
        ]
    }

    #[test]
    fn test_all_variants_status_and_code() {
        for (error, expected_status, expected_code) in all_error_variants() {
            assert_eq!(error.status_code(), expected_status, "状态码不匹配: {expected_code}");
            assert_eq!(error.error_code(), expected_code);
        }
    }

    #[tokio::test]
    async fn test_into_response_body_structure() {
        let candidates = vec![Uuid::new_v4(), Uuid::new_v4()];
        let response = AdminError::from(LoyaltyError::AmbiguousCard {
            candidates: candidates.clone(),
        })
        .into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "AMBIGUOUS_CARD");
        assert_eq!(body["data"]["candidates"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_system_error_hides_details() {
        let response = AdminError::Internal("pool exhausted at 10.0.0.3".into()).into_response();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert!(!body["message"].as_str().unwrap().contains("10.0.0.3"));
    }
}
