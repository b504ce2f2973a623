//! 可观测性模块集成测试
//!
//! 测试 metrics 记录函数与 HTTP 中间件组合后的行为。

mod metrics_tests {
    use carimbo_shared::observability::metrics::{
        record_campaign_generation, record_http_request, record_stamp_grant,
        record_wallet_operation, set_wallet_queue_depth,
    };

    #[test]
    fn test_record_http_request() {
        record_http_request("GET", "/api/v1/customers", 200, 0.05);
        record_http_request("POST", "/api/v1/stamps", 200, 0.02);
        record_http_request("PUT", "/api/v1/loyalty-cards/{id}", 200, 0.08);
        record_http_request("POST", "/api/v1/stamps", 400, 0.01);
        record_http_request("POST", "/api/v1/stamps", 500, 0.25);
    }

    #[test]
    fn test_record_stamp_grant() {
        record_stamp_grant(1, false, "success", 0.01);
        record_stamp_grant(3, true, "success", 0.02);
        record_stamp_grant(0, false, "AMBIGUOUS_CARD", 0.005);
        record_stamp_grant(0, false, "DAILY_LIMIT_EXCEEDED", 0.004);
    }

    #[test]
    fn test_record_campaign_and_wallet() {
        record_campaign_generation("generated");
        record_campaign_generation("fallback");
        record_wallet_operation("wallet_issue", "success");
        record_wallet_operation("update", "exhausted");
        set_wallet_queue_depth(0);
        set_wallet_queue_depth(128);
    }
}

mod middleware_tests {
    use axum::{
        Router,
        body::Body,
        http::{Request, StatusCode},
        middleware,
        routing::get,
    };
    use carimbo_shared::observability::middleware::{RequestId, http_tracing, request_id};
    use tower::ServiceExt;

    fn app() -> Router {
        Router::new()
            .route(
                "/customers/{id}",
                get(|axum::Extension(id): axum::Extension<RequestId>| async move {
                    id.as_str().to_string()
                }),
            )
            .layer(middleware::from_fn(http_tracing))
            .layer(middleware::from_fn(request_id))
    }

    #[tokio::test]
    async fn test_request_id_reaches_handler_and_response() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/customers/42")
                    .header("x-request-id", "abc-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(response.headers().get("x-request-id").unwrap(), "abc-123");
    }

    #[tokio::test]
    async fn test_unknown_route_passes_through() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/nao-existe")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
