//! JWT 认证中间件
//!
//! 验证请求中的 Bearer Token 并将 Claims 注入请求扩展

use axum::{
    body::Body,
    extract::State,
    http::{Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;

use crate::state::AppState;

/// 公开路由（不需要认证）
const PUBLIC_PATHS: [&str; 3] = ["/api/v1/auth/login", "/health", "/ready"];

/// 认证中间件
///
/// 从 Authorization header 中提取 Bearer Token，验证后将 Claims 注入请求扩展，
/// 处理器通过 `Extension<Claims>` 取得当前商家。
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    let path = request.uri().path();
    if PUBLIC_PATHS.iter().any(|p| path == *p) {
        return next.run(request).await;
    }

    let token = match request
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix("Bearer "))
    {
        Some(token) => token,
        None => return unauthorized_response("缺少认证 Token"),
    };

    match state.jwt_manager.verify_token(token) {
        Ok(claims) => {
            request.extensions_mut().insert(claims);
            next.run(request).await
        }
        Err(e) => unauthorized_response(&e.to_string()),
    }
}

fn unauthorized_response(message: &str) -> Response {
    let body = json!({
        "success": false,
        "code": "UNAUTHORIZED",
        "message": message,
        "data": null
    });

    (StatusCode::UNAUTHORIZED, axum::Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use axum::{Extension, Router, middleware, routing::get};
    use carimbo_shared::cache::Cache;
    use carimbo_shared::config::AppConfig;
    use http_body_util::BodyExt;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;
    use uuid::Uuid;

    use crate::auth::Claims;

    fn test_state() -> AppState {
        let config = AppConfig::default();
        let pool = PgPoolOptions::new()
            .connect_lazy(&config.database.url)
            .unwrap();
        let cache = Arc::new(Cache::new(&config.redis).unwrap());
        let (state, worker) = AppState::from_config(pool, cache, &config).unwrap();
        assert!(worker.is_none());
        state
    }

    fn test_app(state: AppState) -> Router {
        Router::new()
            .route(
                "/api/v1/business",
                get(|Extension(claims): Extension<Claims>| async move {
                    claims.business_id.to_string()
                }),
            )
            .route("/health", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
            .with_state(state)
    }

    fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
        let mut builder = Request::builder().uri(uri);
        if let Some(token) = token {
            builder = builder.header("Authorization", format!("Bearer {}", token));
        }
        builder.body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_missing_token_is_rejected() {
        let app = test_app(test_state());

        let response = app
            .oneshot(get_request("/api/v1/business", None))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        let json: serde_json::Value = serde_json::from_slice(&body).unwrap();
        assert_eq!(json["code"], "UNAUTHORIZED");
        assert_eq!(json["success"], false);
    }

    #[tokio::test]
    async fn test_invalid_token_is_rejected() {
        let app = test_app(test_state());

        let response = app
            .oneshot(get_request("/api/v1/business", Some("not-a-jwt")))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_valid_token_injects_claims() {
        let state = test_state();
        let business_id = Uuid::new_v4();
        let (token, _) = state
            .jwt_manager
            .generate_token(Uuid::new_v4(), business_id, "dono@padaria.com.br")
            .unwrap();
        let app = test_app(state);

        let response = app
            .oneshot(get_request("/api/v1/business", Some(&token)))
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let body = response.into_body().collect().await.unwrap().to_bytes();
        assert_eq!(body, business_id.to_string().as_bytes());
    }

    #[tokio::test]
    async fn test_public_path_skips_auth() {
        let app = test_app(test_state());

        let response = app.oneshot(get_request("/health", None)).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
    }
}
