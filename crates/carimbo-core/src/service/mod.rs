//! 服务层
//!
//! 业务编排：参数校验、租户隔离、调用仓储与外部服务、缓存失效

pub mod business_service;
pub mod campaign_service;
pub mod customer_service;
pub mod dto;
pub mod enrollment_service;
pub mod loyalty_card_service;
pub mod stamp_service;
pub mod wallet_service;

pub use business_service::BusinessService;
pub use campaign_service::CampaignService;
pub use customer_service::CustomerService;
pub use dto::*;
pub use enrollment_service::EnrollmentService;
pub use loyalty_card_service::LoyaltyCardService;
pub use stamp_service::StampService;
pub use wallet_service::WalletPassService;

use tracing::warn;
use uuid::Uuid;

use carimbo_shared::cache::{Cache, CacheKey};

/// 清除顾客卡片列表缓存，失败只记录日志
pub(crate) async fn invalidate_customer_cards(
    cache: Option<&Cache>,
    business_id: Uuid,
    customer_id: Uuid,
) {
    if let Some(cache) = cache {
        let key = CacheKey::customer_cards(business_id, customer_id);
        if let Err(e) = cache.delete(&key).await {
            warn!(key = %key, error = %e, "缓存失效失败");
        }
    }
}
