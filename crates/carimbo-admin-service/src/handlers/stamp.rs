//! 集点发放

use axum::{Extension, Json, extract::State};
use validator::Validate;

use carimbo_core::dto::GrantStampsResult;

use crate::auth::Claims;
use crate::dto::{ApiResponse, GrantStampsRequest};
use crate::error::Result;
use crate::state::AppState;

/// 给顾客集点
///
/// POST /api/v1/stamps
///
/// 顾客有多张集点卡时必须传 loyaltyCardId，否则返回 AMBIGUOUS_CARD 且不做任何写入
pub async fn grant_stamps(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<GrantStampsRequest>,
) -> Result<Json<ApiResponse<GrantStampsResult>>> {
    req.validate()?;
    let command = req.into_command(claims.sub)?;

    let result = state
        .stamps
        .grant_stamps(claims.business_id, command)
        .await?;

    let message = if result.completed_now {
        "集点卡已集满"
    } else {
        "集点成功"
    };
    Ok(Json(ApiResponse::success_with_message(result, message)))
}
