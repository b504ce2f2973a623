//! 顾客管理 API 处理器

use axum::{
    Extension, Json,
    extract::{Path, Query, State},
};
use uuid::Uuid;
use validator::Validate;

use carimbo_core::{Customer, EnrollmentView, StampTransaction};

use crate::auth::Claims;
use crate::dto::{
    ApiResponse, CreateCustomerRequest, CustomerQuery, EnrollRequest, PageResponse,
    PaginationParams, UpdateCustomerRequest,
};
use crate::error::Result;
use crate::state::AppState;

/// GET /api/v1/customers
pub async fn list_customers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<CustomerQuery>,
) -> Result<Json<ApiResponse<PageResponse<Customer>>>> {
    let pagination = query.pagination();
    let search = query.search.filter(|s| !s.trim().is_empty());
    let (items, total) = state
        .customers
        .list(
            claims.business_id,
            search,
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

/// POST /api/v1/customers
pub async fn create_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>> {
    req.validate()?;
    let customer = state
        .customers
        .create(claims.business_id, req.into())
        .await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// GET /api/v1/customers/{id}
pub async fn get_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Customer>>> {
    let customer = state.customers.get(claims.business_id, id).await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// PUT /api/v1/customers/{id}
pub async fn update_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<UpdateCustomerRequest>,
) -> Result<Json<ApiResponse<Customer>>> {
    req.validate()?;
    let customer = state
        .customers
        .update(claims.business_id, id, req.into())
        .await?;
    Ok(Json(ApiResponse::success(customer)))
}

/// DELETE /api/v1/customers/{id}
pub async fn delete_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<()>>> {
    state.customers.delete(claims.business_id, id).await?;
    Ok(Json(ApiResponse::<()>::success_empty()))
}

/// 顾客已加入的集点卡
///
/// GET /api/v1/customers/{id}/cards
pub async fn list_customer_cards(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<Vec<EnrollmentView>>>> {
    let cards = state
        .enrollments
        .list_for_customer(claims.business_id, id)
        .await?;
    Ok(Json(ApiResponse::success(cards)))
}

/// 顾客加入集点卡
///
/// POST /api/v1/customers/{id}/cards
pub async fn enroll_customer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(req): Json<EnrollRequest>,
) -> Result<Json<ApiResponse<EnrollmentView>>> {
    let view = state
        .enrollments
        .enroll(claims.business_id, id, req.loyalty_card_id)
        .await?;
    Ok(Json(ApiResponse::success(view)))
}

/// 顾客集点流水
///
/// GET /api/v1/customers/{id}/stamps
pub async fn list_stamp_history(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Query(pagination): Query<PaginationParams>,
) -> Result<Json<ApiResponse<PageResponse<StampTransaction>>>> {
    let (items, total) = state
        .stamps
        .history(
            claims.business_id,
            id,
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
