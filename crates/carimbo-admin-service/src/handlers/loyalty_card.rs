//! 集点卡管理 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;
use validator::Validate;

use carimbo_core::LoyaltyCard;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, CreateLoyaltyCardRequest, LoyaltyCardQuery, UpdateLoyaltyCardRequest,
};
use crate::error::Result;
use crate::state::AppState;

/// GET /api/v1/loyalty-cards
pub async fn list_loyalty_cards(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<LoyaltyCardQuery>,
) -> Result<Json<ApiResponse<Vec<LoyaltyCard>>>> {
    let cards = state
        .loyalty_cards
        .list(claims.business_id, query.include_archived)
        .await?;
    Ok(Json(ApiResponse::success(cards)))
}

/// POST /api/v1/loyalty-cards
pub async fn create_loyalty_card(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateLoyaltyCardRequest>,
) -> Result<Json<ApiResponse<LoyaltyCard>>> {
    req.validate()?;
    let card = state
        .loyalty_cards
        .create(claims.business_id, req.into())
        .await?;
    Ok(Json(ApiResponse::success(card)))
}

/// GET /api/v1/loyalty-cards/{id}
pub async fn get_loyalty_card(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LoyaltyCard>>> {
    let card = state.loyalty_cards.get(claims.business_id, id).await?;
    Ok(Json(ApiResponse::success(card)))
}

/// PUT /api/v1/loyalty-cards/{id}
pub async fn update_loyalty_card(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateLoyaltyCardRequest>,
) -> Result<Json<ApiResponse<LoyaltyCard>>> {
    req.validate()?;
    let card = state
        .loyalty_cards
        .update(claims.business_id, id, req.into())
        .await?;
    Ok(Json(ApiResponse::success(card)))
}

/// 删除即归档：已有顾客进度保留，不再接受新顾客
///
/// DELETE /api/v1/loyalty-cards/{id}
pub async fn archive_loyalty_card(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<LoyaltyCard>>> {
    let card = state.loyalty_cards.archive(claims.business_id, id).await?;
    Ok(Json(ApiResponse::success_with_message(card, "集点卡已归档")))
}
