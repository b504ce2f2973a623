//! 商家资料

use axum::{Extension, Json, extract::State};
use validator::Validate;

use carimbo_core::Business;

use crate::auth::Claims;
use crate::dto::{ApiResponse, UpdateBusinessRequest};
use crate::error::Result;
use crate::state::AppState;

/// GET /api/v1/business
pub async fn get_business(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<Json<ApiResponse<Business>>> {
    let business = state.businesses.get(claims.business_id).await?;
    Ok(Json(ApiResponse::success(business)))
}

/// PUT /api/v1/business
pub async fn update_business(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<UpdateBusinessRequest>,
) -> Result<Json<ApiResponse<Business>>> {
    req.validate()?;
    let business = state
        .businesses
        .update(claims.business_id, req.into())
        .await?;
    Ok(Json(ApiResponse::success(business)))
}
