//! 电子卡券

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use carimbo_core::wallet::PassHandle;

use crate::auth::Claims;
use crate::dto::ApiResponse;
use crate::error::Result;
use crate::state::AppState;

/// 发放卡券（已发放时刷新）
///
/// POST /api/v1/enrollments/{id}/wallet-pass
pub async fn issue_wallet_pass(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<PassHandle>>> {
    let handle = state.wallet()?.issue(claims.business_id, id).await?;
    Ok(Json(ApiResponse::success(handle)))
}

/// PUT /api/v1/enrollments/{id}/wallet-pass
pub async fn refresh_wallet_pass(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.wallet()?.refresh(claims.business_id, id).await?;
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// DELETE /api/v1/enrollments/{id}/wallet-pass
pub async fn revoke_wallet_pass(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.wallet()?.revoke(claims.business_id, id).await?;
    Ok(Json(ApiResponse::<()>::success_empty()))
}
