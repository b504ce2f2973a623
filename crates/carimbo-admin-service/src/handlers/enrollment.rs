//! 顾客卡片

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use uuid::Uuid;

use carimbo_core::EnrollmentView;

use crate::auth::Claims;
use crate::dto::ApiResponse;
use crate::error::Result;
use crate::state::AppState;

/// GET /api/v1/enrollments/{id}
pub async fn get_enrollment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<EnrollmentView>>> {
    let view = state.enrollments.get(claims.business_id, id).await?;
    Ok(Json(ApiResponse::success(view)))
}

/// 管理员删除顾客卡片（集点进度一并删除）
///
/// DELETE /api/v1/enrollments/{id}
pub async fn delete_enrollment(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.enrollments.remove(claims.business_id, id).await?;
    Ok(Json(ApiResponse::<()>::success_empty()))
}
