//! 应用状态定义
//!
//! 所有依赖在启动时显式构造并注入，处理器通过 `State<AppState>` 取用

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;
use tracing::info;

use carimbo_core::wallet::WalletJobHandler;
use carimbo_core::{
    BusinessRepository, BusinessService, CampaignRepository, CampaignService, CustomerRepository,
    CustomerService, EnrollmentRepository, EnrollmentService, HttpWalletPassProvider,
    LlmContentGenerator, LoyaltyCardRepository, LoyaltyCardService, StampService,
    StampTransactionRepository, WalletPassService, WalletRetryQueue,
};
use carimbo_shared::cache::Cache;
use carimbo_shared::config::AppConfig;
use carimbo_shared::retry::RetryPolicy;

use crate::auth::{JwtConfig, JwtManager};
use crate::error::{AdminError, Result};

/// Axum 应用共享状态
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL 连接池（登录查询与就绪探针）
    pub pool: PgPool,
    pub cache: Arc<Cache>,
    pub jwt_manager: Arc<JwtManager>,
    pub businesses: Arc<BusinessService>,
    pub customers: Arc<CustomerService>,
    pub loyalty_cards: Arc<LoyaltyCardService>,
    pub enrollments: Arc<EnrollmentService>,
    pub stamps: Arc<StampService>,
    pub campaigns: Arc<CampaignService>,
    /// 未启用电子卡券时为 None
    pub wallet: Option<Arc<WalletPassService>>,
}

impl AppState {
    /// 按配置装配仓储、服务和卡券重试队列
    ///
    /// 启用电子卡券时返回重试队列 worker 的句柄，所有服务释放后 worker 退出
    pub fn from_config(
        pool: PgPool,
        cache: Arc<Cache>,
        config: &AppConfig,
    ) -> Result<(Self, Option<JoinHandle<()>>)> {
        let business_repo = Arc::new(BusinessRepository::new(pool.clone()));
        let customer_repo = Arc::new(CustomerRepository::new(pool.clone()));
        let card_repo = Arc::new(LoyaltyCardRepository::new(pool.clone()));
        let enrollment_repo = Arc::new(EnrollmentRepository::new(pool.clone()));
        let transaction_repo = Arc::new(StampTransactionRepository::new(pool.clone()));
        let campaign_repo = Arc::new(CampaignRepository::new(pool.clone()));

        let (wallet, wallet_queue, worker) = if config.wallet.enabled {
            let provider = HttpWalletPassProvider::new(&config.wallet)
                .map_err(|e| AdminError::Internal(format!("卡券客户端初始化失败: {}", e)))?;
            let service = Arc::new(
                WalletPassService::new(
                    Arc::new(provider),
                    business_repo.clone(),
                    customer_repo.clone(),
                    enrollment_repo.clone(),
                )
                .with_cache(cache.clone()),
            );
            let handler: Arc<dyn WalletJobHandler> = service.clone();
            let (queue, worker) = WalletRetryQueue::start(
                handler,
                RetryPolicy::from(&config.wallet),
                config.wallet.queue_capacity,
            );
            (Some(service), Some(queue), Some(worker))
        } else {
            info!("电子卡券未启用");
            (None, None, None)
        };

        let generator = LlmContentGenerator::new(config.ai.clone())
            .map_err(|e| AdminError::Internal(format!("AI 客户端初始化失败: {}", e)))?;

        let mut stamps = StampService::new(
            customer_repo.clone(),
            enrollment_repo.clone(),
            transaction_repo,
            config.stamps.max_increment,
        )
        .with_cache(cache.clone());
        let mut enrollments = EnrollmentService::new(
            customer_repo.clone(),
            card_repo.clone(),
            enrollment_repo,
        )
        .with_cache(cache.clone(), Duration::from_secs(config.stamps.cache_ttl_secs));
        if let Some(queue) = wallet_queue {
            stamps = stamps.with_wallet_queue(queue.clone());
            enrollments = enrollments.with_wallet_queue(queue);
        }

        let state = Self {
            jwt_manager: Arc::new(JwtManager::new(JwtConfig::from(&config.auth))),
            businesses: Arc::new(BusinessService::new(business_repo.clone())),
            customers: Arc::new(CustomerService::new(customer_repo).with_cache(cache.clone())),
            loyalty_cards: Arc::new(LoyaltyCardService::new(card_repo)),
            enrollments: Arc::new(enrollments),
            stamps: Arc::new(stamps),
            campaigns: Arc::new(CampaignService::new(
                campaign_repo,
                business_repo,
                Arc::new(generator),
            )),
            wallet,
            pool,
            cache,
        };

        Ok((state, worker))
    }

    /// 电子卡券服务，未启用时返回 WalletDisabled
    pub fn wallet(&self) -> Result<&WalletPassService> {
        self.wallet
            .as_deref()
            .ok_or(AdminError::Loyalty(carimbo_core::LoyaltyError::WalletDisabled))
    }
}
