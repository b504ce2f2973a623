//! 认证相关的 HTTP 处理器

use axum::{Extension, Json, extract::State};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};
use validator::Validate;

use carimbo_core::{Business, MerchantUser};

use crate::auth::{Claims, verify_password};
use crate::dto::ApiResponse;
use crate::error::{AdminError, Result};
use crate::state::AppState;

/// 登录请求
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "邮箱格式不正确"))]
    pub email: String,
    #[validate(length(min = 1, max = 100, message = "密码长度必须在 1-100 之间"))]
    pub password: String,
}

/// 登录响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_at: i64,
    pub user: MerchantUser,
}

/// 当前用户响应
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUserResponse {
    pub user: MerchantUser,
    pub business: Business,
}

const MERCHANT_COLUMNS: &str =
    "id, business_id, email, password_hash, display_name, status, last_login_at, created_at";

/// 商家用户登录
///
/// POST /api/v1/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginResponse>>> {
    req.validate()?;

    let sql = format!(
        "SELECT {} FROM merchant_users WHERE email = $1",
        MERCHANT_COLUMNS
    );
    let user: MerchantUser = sqlx::query_as(&sql)
        .bind(req.email.trim().to_lowercase())
        .fetch_optional(&state.pool)
        .await?
        .ok_or(AdminError::InvalidCredentials)?;

    if !verify_password(&req.password, &user.password_hash)? {
        warn!(email = %user.email, "登录密码错误");
        return Err(AdminError::InvalidCredentials);
    }
    if !user.is_active() {
        return Err(AdminError::UserDisabled);
    }

    sqlx::query("UPDATE merchant_users SET last_login_at = NOW() WHERE id = $1")
        .bind(user.id)
        .execute(&state.pool)
        .await?;

    let (token, expires_at) =
        state
            .jwt_manager
            .generate_token(user.id, user.business_id, &user.email)?;

    info!(user_id = %user.id, business_id = %user.business_id, "商家用户登录");
    Ok(Json(ApiResponse::success(LoginResponse {
        token,
        expires_at,
        user,
    })))
}

/// 当前登录用户及所属商家
///
/// GET /api/v1/auth/me
pub async fn me(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<CurrentUserResponse>>> {
    let sql = format!(
        "SELECT {} FROM merchant_users WHERE id = $1 AND business_id = $2",
        MERCHANT_COLUMNS
    );
    let user: MerchantUser = sqlx::query_as(&sql)
        .bind(claims.sub)
        .bind(claims.business_id)
        .fetch_optional(&state.pool)
        .await?
        .ok_or_else(|| AdminError::Unauthorized("用户不存在".to_string()))?;

    let business = state.businesses.get(claims.business_id).await?;

    Ok(Json(ApiResponse::success(CurrentUserResponse { user, business })))
}
