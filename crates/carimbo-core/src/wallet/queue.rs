use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{error, info, warn};
use uuid::Uuid;

use carimbo_shared::observability::metrics;
use carimbo_shared::retry::{RetryPolicy, retry_with_policy};

use crate::error::LoyaltyError;

/// 卡券后台任务
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WalletJob {
    /// 按顾客卡片最新进度刷新卡券
    Refresh {
        business_id: Uuid,
        enrollment_id: Uuid,
    },
    /// 删除卡券（顾客卡片已删除）
    Revoke { serial: String },
}

impl WalletJob {
    pub fn operation(&self) -> &'static str {
        match self {
            Self::Refresh { .. } => "wallet_refresh",
            Self::Revoke { .. } => "wallet_revoke",
        }
    }
}

/// 任务执行者
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait WalletJobHandler: Send + Sync {
    async fn handle(&self, job: &WalletJob) -> Result<(), LoyaltyError>;
}

/// 卡券重试队列
///
/// 有界 mpsc 队列 + 单个后台 worker。worker 按 RetryPolicy 指数退避重试，
/// 重试耗尽后记录错误日志和指标。所有发送端释放后 worker 退出。
#[derive(Clone)]
pub struct WalletRetryQueue {
    sender: mpsc::Sender<WalletJob>,
}

impl WalletRetryQueue {
    /// 创建队列并启动 worker
    pub fn start(
        handler: Arc<dyn WalletJobHandler>,
        policy: RetryPolicy,
        capacity: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::channel(capacity.max(1));
        let worker = tokio::spawn(run_worker(receiver, handler, policy));
        info!(capacity, "卡券重试队列已启动");
        (Self { sender }, worker)
    }

    /// 入队，不阻塞；队列已满或已关闭时返回 false
    pub fn enqueue(&self, job: WalletJob) -> bool {
        match self.sender.try_send(job) {
            Ok(()) => {
                metrics::set_wallet_queue_depth(self.depth());
                true
            }
            Err(mpsc::error::TrySendError::Full(job)) => {
                warn!(?job, "卡券重试队列已满，任务被丢弃");
                metrics::record_wallet_operation(job.operation(), "dropped");
                false
            }
            Err(mpsc::error::TrySendError::Closed(job)) => {
                error!(?job, "卡券重试队列已关闭");
                false
            }
        }
    }

    /// 当前排队任务数
    pub fn depth(&self) -> usize {
        self.sender.max_capacity() - self.sender.capacity()
    }
}

async fn run_worker(
    mut receiver: mpsc::Receiver<WalletJob>,
    handler: Arc<dyn WalletJobHandler>,
    policy: RetryPolicy,
) {
    while let Some(job) = receiver.recv().await {
        let operation = job.operation();
        let result = retry_with_policy(&policy, operation, LoyaltyError::is_retryable, || {
            handler.handle(&job)
        })
        .await;

        match result {
            Ok(()) => metrics::record_wallet_operation(operation, "success"),
            Err(e) if e.is_retryable() => {
                error!(?job, error = %e, "卡券任务重试耗尽");
                metrics::record_wallet_operation(operation, "exhausted");
            }
            Err(e) => {
                error!(?job, error = %e, "卡券任务失败");
                metrics::record_wallet_operation(operation, "failed");
            }
        }
    }
    info!("卡券重试队列 worker 退出");
}
