//! 路由配置模块
//!
//! 定义所有 REST API 端点的路由映射，统一挂载在 /api/v1 下

use axum::{
    Router,
    routing::{get, post},
};

use crate::{handlers, state::AppState};

/// 认证路由（login 为公开路由）
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/auth/me", get(handlers::auth::me))
}

/// 商家资料
fn business_routes() -> Router<AppState> {
    Router::new().route(
        "/business",
        get(handlers::business::get_business).put(handlers::business::update_business),
    )
}

/// 顾客管理及其名下卡片、集点流水
fn customer_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/customers",
            get(handlers::customer::list_customers).post(handlers::customer::create_customer),
        )
        .route(
            "/customers/{id}",
            get(handlers::customer::get_customer)
                .put(handlers::customer::update_customer)
                .delete(handlers::customer::delete_customer),
        )
        .route(
            "/customers/{id}/cards",
            get(handlers::customer::list_customer_cards).post(handlers::customer::enroll_customer),
        )
        .route(
            "/customers/{id}/stamps",
            get(handlers::customer::list_stamp_history),
        )
}

/// 集点卡管理
fn loyalty_card_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/loyalty-cards",
            get(handlers::loyalty_card::list_loyalty_cards)
                .post(handlers::loyalty_card::create_loyalty_card),
        )
        .route(
            "/loyalty-cards/{id}",
            get(handlers::loyalty_card::get_loyalty_card)
                .put(handlers::loyalty_card::update_loyalty_card)
                .delete(handlers::loyalty_card::archive_loyalty_card),
        )
}

/// 顾客卡片与电子卡券
fn enrollment_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/enrollments/{id}",
            get(handlers::enrollment::get_enrollment)
                .delete(handlers::enrollment::delete_enrollment),
        )
        .route(
            "/enrollments/{id}/wallet-pass",
            post(handlers::wallet_pass::issue_wallet_pass)
                .put(handlers::wallet_pass::refresh_wallet_pass)
                .delete(handlers::wallet_pass::revoke_wallet_pass),
        )
}

/// 集点发放
fn stamp_routes() -> Router<AppState> {
    Router::new().route("/stamps", post(handlers::stamp::grant_stamps))
}

/// 营销活动
fn campaign_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/campaigns",
            get(handlers::campaign::list_campaigns).post(handlers::campaign::create_campaign),
        )
        .route(
            "/campaigns/generate",
            post(handlers::campaign::generate_campaign),
        )
        .route(
            "/campaigns/{id}",
            get(handlers::campaign::get_campaign)
                .put(handlers::campaign::update_campaign)
                .delete(handlers::campaign::delete_campaign),
        )
}

/// 构建完整的 API 路由
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(auth_routes())
        .merge(business_routes())
        .merge(customer_routes())
        .merge(loyalty_card_routes())
        .merge(enrollment_routes())
        .merge(stamp_routes())
        .merge(campaign_routes())
}
