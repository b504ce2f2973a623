//! 电子钱包卡券
//!
//! - `WalletPassProvider`：外部卡券服务抽象（创建 / 更新 / 删除）
//! - `HttpWalletPassProvider`：PassKit 风格 REST 接口实现
//! - `WalletRetryQueue`：后台重试队列，集点后的卡券刷新不阻塞请求

mod http;
mod payload;
mod queue;

pub use http::HttpWalletPassProvider;
pub use payload::PassPayload;
pub use queue::{WalletJob, WalletJobHandler, WalletRetryQueue};
#[cfg(test)]
pub use queue::MockWalletJobHandler;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// 卡券服务错误
#[derive(Debug, Clone, Error)]
pub enum WalletError {
    #[error("卡券不存在: {0}")]
    NotFound(String),

    /// 请求被拒绝（4xx，重试无意义）
    #[error("卡券请求被拒绝: {0}")]
    Rejected(String),

    /// 服务暂不可用（5xx / 429）
    #[error("卡券服务不可用: {0}")]
    Unavailable(String),

    #[error("卡券服务网络错误: {0}")]
    Transport(String),
}

impl WalletError {
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable(_) | Self::Transport(_))
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "WALLET_PASS_NOT_FOUND",
            Self::Rejected(_) => "WALLET_REJECTED",
            Self::Unavailable(_) => "WALLET_UNAVAILABLE",
            Self::Transport(_) => "WALLET_TRANSPORT_ERROR",
        }
    }
}

/// 创建卡券的返回
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PassHandle {
    pub serial: String,
    /// 顾客添加卡券的链接
    #[serde(default)]
    pub url: Option<String>,
}

/// 电子卡券服务
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletPassProvider: Send + Sync {
    async fn create_pass(&self, payload: &PassPayload) -> Result<PassHandle, WalletError>;

    async fn update_pass(&self, serial: &str, payload: &PassPayload) -> Result<(), WalletError>;

    async fn delete_pass(&self, serial: &str) -> Result<(), WalletError>;
}
