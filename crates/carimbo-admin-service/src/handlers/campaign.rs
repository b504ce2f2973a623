//! 营销活动 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use carimbo_core::Campaign;
use carimbo_core::dto::GeneratedCampaign;

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, CampaignQuery, CreateCampaignRequest, GenerateCampaignRequest, PageResponse,
    UpdateCampaignRequest,
};
use crate::error::Result;
use crate::state::AppState;

/// GET /api/v1/campaigns
pub async fn list_campaigns(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<CampaignQuery>,
) -> Result<Json<ApiResponse<PageResponse<Campaign>>>> {
    let pagination = query.pagination();
    let (items, total) = state
        .campaigns
        .list(
            claims.business_id,
            query.status,
            pagination.limit(),
            pagination.offset(),
        )
        .await?;

    Ok(Json(ApiResponse::success(PageResponse::new(
        items,
        total,
        pagination.page,
        pagination.limit(),
    ))))
}

/// 手动创建活动
///
/// POST /api/v1/campaigns
pub async fn create_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<Json<ApiResponse<Campaign>>> {
    req.validate()?;
    let campaign = state
        .campaigns
        .create(claims.business_id, req.into())
        .await?;
    Ok(Json(ApiResponse::success(campaign)))
}

/// AI 生成活动草稿
///
/// POST /api/v1/campaigns/generate
///
/// 生成失败时仍返回兜底文案，响应中 contentSource 为 fallback
pub async fn generate_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<GenerateCampaignRequest>,
) -> Result<Json<ApiResponse<GeneratedCampaign>>> {
    req.validate()?;
    let generated = state
        .campaigns
        .generate(claims.business_id, req.into())
        .await?;

    info!(
        campaign_id = %generated.campaign.id,
        source = generated.content_source.as_str(),
        "活动草稿已返回"
    );
    Ok(Json(ApiResponse::success(generated)))
}

/// GET /api/v1/campaigns/{id}
pub async fn get_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Campaign>>> {
    let campaign = state.campaigns.get(claims.business_id, id).await?;
    Ok(Json(ApiResponse::success(campaign)))
}

/// PUT /api/v1/campaigns/{id}
pub async fn update_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCampaignRequest>,
) -> Result<Json<ApiResponse<Campaign>>> {
    req.validate()?;
    let campaign = state
        .campaigns
        .update(claims.business_id, id, req.into())
        .await?;
    Ok(Json(ApiResponse::success(campaign)))
}

/// DELETE /api/v1/campaigns/{id}
pub async fn delete_campaign(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.campaigns.delete(claims.business_id, id).await?;
    Ok(Json(ApiResponse::<()>::success_empty()))
}
