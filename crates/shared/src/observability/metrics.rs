//! Prometheus 指标模块
//!
//! 基于 metrics crate 和 metrics-exporter-prometheus 实现指标收集与导出。
//! 指标通过独立的 HTTP 端口暴露，供 Prometheus 抓取。

use anyhow::Result;
use axum::{Router, routing::get};
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing::{error, info};

use super::ObservabilityConfig;

/// Metrics 资源守卫
pub struct MetricsHandle {
    _server_handle: tokio::task::JoinHandle<()>,
}

/// 初始化 Prometheus 指标导出
///
/// 启动一个独立的 HTTP 服务器在指定端口暴露 `/metrics` 端点。
pub async fn init(config: &ObservabilityConfig) -> Result<MetricsHandle> {
    let handle = PrometheusBuilder::new().install_recorder()?;

    register_common_metrics(&config.service_name);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.metrics_port));
    let server_handle = start_metrics_server(addr, handle).await?;

    Ok(MetricsHandle {
        _server_handle: server_handle,
    })
}

/// 注册预定义的业务指标描述
fn register_common_metrics(service_name: &str) {
    metrics::describe_counter!("http_requests_total", "Total number of HTTP requests");
    metrics::describe_histogram!(
        "http_request_duration_seconds",
        "HTTP request duration in seconds"
    );

    metrics::describe_counter!("stamps_granted_total", "Total number of stamps applied");
    metrics::describe_counter!(
        "card_completions_total",
        "Total number of loyalty cards filled up"
    );
    metrics::describe_histogram!(
        "stamp_grant_duration_seconds",
        "Stamp grant duration in seconds"
    );

    metrics::describe_counter!(
        "campaign_generations_total",
        "Total number of AI campaign generations"
    );
    metrics::describe_counter!(
        "wallet_pass_operations_total",
        "Total number of wallet pass operations"
    );
    metrics::describe_gauge!(
        "wallet_queue_depth",
        "Jobs waiting in the wallet retry queue"
    );

    metrics::counter!("service_starts_total", "service" => service_name.to_string()).increment(1);
}

/// 启动指标 HTTP 服务器
async fn start_metrics_server(
    addr: SocketAddr,
    handle: PrometheusHandle,
) -> Result<tokio::task::JoinHandle<()>> {
    let app = Router::new()
        .route("/metrics", get(move || std::future::ready(handle.render())))
        .route("/health", get(|| async { "OK" }));

    let listener = TcpListener::bind(addr).await?;
    info!("Metrics server listening on {}", addr);

    let server_handle = tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            error!("Metrics server error: {}", e);
        }
    });

    Ok(server_handle)
}

// ============================================================================
// 指标记录函数
// ============================================================================

/// 记录 HTTP 请求
#[inline]
pub fn record_http_request(method: &str, path: &str, status: u16, duration_secs: f64) {
    let status_str = status.to_string();
    metrics::counter!(
        "http_requests_total",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str.clone()
    )
    .increment(1);

    metrics::histogram!(
        "http_request_duration_seconds",
        "method" => method.to_string(),
        "path" => path.to_string(),
        "status" => status_str
    )
    .record(duration_secs);
}

/// 记录一次集点发放
#[inline]
pub fn record_stamp_grant(stamps_applied: u64, completed: bool, status: &str, duration_secs: f64) {
    metrics::counter!("stamps_granted_total", "status" => status.to_string())
        .increment(stamps_applied);
    if completed {
        metrics::counter!("card_completions_total").increment(1);
    }
    metrics::histogram!("stamp_grant_duration_seconds", "status" => status.to_string())
        .record(duration_secs);
}

/// 记录 AI 文案生成（source: generated / fallback）
#[inline]
pub fn record_campaign_generation(source: &str) {
    metrics::counter!("campaign_generations_total", "source" => source.to_string()).increment(1);
}

/// 记录电子卡券操作
#[inline]
pub fn record_wallet_operation(operation: &str, result: &str) {
    metrics::counter!(
        "wallet_pass_operations_total",
        "operation" => operation.to_string(),
        "result" => result.to_string()
    )
    .increment(1);
}

/// 更新重试队列深度
#[inline]
pub fn set_wallet_queue_depth(depth: usize) {
    metrics::gauge!("wallet_queue_depth").set(depth as f64);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_functions_do_not_panic() {
        // 未安装 recorder 时记录应为空操作
        record_http_request("GET", "/api/v1/customers", 200, 0.1);
        record_stamp_grant(3, true, "success", 0.02);
        record_campaign_generation("fallback");
        record_wallet_operation("update", "exhausted");
        set_wallet_queue_depth(4);
    }
}
