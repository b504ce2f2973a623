//! 顾客卡片服务
//!
//! 加入集点卡、查询顾客卡片（Redis 读穿缓存）、删除顾客卡片

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use carimbo_shared::cache::{Cache, CacheKey};

use super::invalidate_customer_cards;
use crate::error::{LoyaltyError, Result};
use crate::models::EnrollmentView;
use crate::repository::{
    CustomerRepositoryTrait, EnrollmentRepositoryTrait, LoyaltyCardRepositoryTrait,
};
use crate::wallet::{WalletJob, WalletRetryQueue};

pub struct EnrollmentService {
    customers: Arc<dyn CustomerRepositoryTrait>,
    cards: Arc<dyn LoyaltyCardRepositoryTrait>,
    enrollments: Arc<dyn EnrollmentRepositoryTrait>,
    cache: Option<Arc<Cache>>,
    cache_ttl: Duration,
    wallet_queue: Option<WalletRetryQueue>,
}

impl EnrollmentService {
    pub fn new(
        customers: Arc<dyn CustomerRepositoryTrait>,
        cards: Arc<dyn LoyaltyCardRepositoryTrait>,
        enrollments: Arc<dyn EnrollmentRepositoryTrait>,
    ) -> Self {
        Self {
            customers,
            cards,
            enrollments,
            cache: None,
            cache_ttl: Duration::from_secs(300),
            wallet_queue: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<Cache>, ttl: Duration) -> Self {
        self.cache = Some(cache);
        self.cache_ttl = ttl;
        self
    }

    pub fn with_wallet_queue(mut self, queue: WalletRetryQueue) -> Self {
        self.wallet_queue = Some(queue);
        self
    }

    async fn ensure_customer(&self, business_id: Uuid, customer_id: Uuid) -> Result<()> {
        self.customers
            .get(business_id, customer_id)
            .await?
            .map(|_| ())
            .ok_or(LoyaltyError::CustomerNotFound(customer_id))
    }

    /// 顾客加入集点卡，初始 0 点
    #[instrument(skip(self), fields(business_id = %business_id, customer_id = %customer_id))]
    pub async fn enroll(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        loyalty_card_id: Uuid,
    ) -> Result<EnrollmentView> {
        self.ensure_customer(business_id, customer_id).await?;

        let card = self
            .cards
            .get(business_id, loyalty_card_id)
            .await?
            .ok_or(LoyaltyError::LoyaltyCardNotFound(loyalty_card_id))?;
        if card.is_archived() {
            return Err(LoyaltyError::CardArchived(loyalty_card_id));
        }

        let enrollment = self
            .enrollments
            .create(business_id, customer_id, loyalty_card_id)
            .await?;

        invalidate_customer_cards(self.cache.as_deref(), business_id, customer_id).await;
        info!(enrollment_id = %enrollment.id, loyalty_card_id = %loyalty_card_id, "顾客已加入集点卡");

        self.get(business_id, enrollment.id).await
    }

    pub async fn get(&self, business_id: Uuid, enrollment_id: Uuid) -> Result<EnrollmentView> {
        self.enrollments
            .get_view(business_id, enrollment_id)
            .await?
            .ok_or(LoyaltyError::EnrollmentNotFound(enrollment_id))
    }

    /// 顾客的全部卡片
    #[instrument(skip(self))]
    pub async fn list_for_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<EnrollmentView>> {
        let key = CacheKey::customer_cards(business_id, customer_id);

        if let Some(cache) = &self.cache {
            match cache.get::<Vec<EnrollmentView>>(&key).await {
                Ok(Some(cached)) => {
                    debug!("命中顾客卡片缓存");
                    return Ok(cached);
                }
                Ok(None) => {}
                Err(e) => warn!(key = %key, error = %e, "读取缓存失败，回源数据库"),
            }
        }

        self.ensure_customer(business_id, customer_id).await?;
        let views = self
            .enrollments
            .list_for_customer(business_id, customer_id)
            .await?;

        if let Some(cache) = &self.cache
            && let Err(e) = cache.set(&key, &views, self.cache_ttl).await
        {
            warn!(key = %key, error = %e, "写入缓存失败");
        }

        Ok(views)
    }

    /// 删除顾客卡片，已发卡券时入队删除卡券
    #[instrument(skip(self))]
    pub async fn remove(&self, business_id: Uuid, enrollment_id: Uuid) -> Result<()> {
        let deleted = self
            .enrollments
            .delete(business_id, enrollment_id)
            .await?
            .ok_or(LoyaltyError::EnrollmentNotFound(enrollment_id))?;

        invalidate_customer_cards(self.cache.as_deref(), business_id, deleted.customer_id).await;

        if let Some(serial) = deleted.wallet_pass_serial {
            match &self.wallet_queue {
                Some(queue) => {
                    queue.enqueue(WalletJob::Revoke { serial });
                }
                None => warn!(serial = %serial, "未启用卡券队列，卡券未删除"),
            }
        }

        info!(enrollment_id = %enrollment_id, "顾客卡片已删除");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardStatus, Enrollment, EnrollmentStatus};
    use crate::repository::{
        MockCustomerRepositoryTrait, MockEnrollmentRepositoryTrait,
        MockLoyaltyCardRepositoryTrait,
    };
    use crate::test_fixtures::{customer, enrollment_view, loyalty_card};
    use chrono::Utc;

    fn customers_in(business_id: Uuid) -> MockCustomerRepositoryTrait {
        let mut customers = MockCustomerRepositoryTrait::new();
        customers
            .expect_get()
            .returning(move |b, c| Ok((b == business_id).then(|| customer(b, c))));
        customers
    }

    #[tokio::test]
    async fn test_enroll_creates_fresh_enrollment() {
        let business_id = Uuid::new_v4();
        let customer_id = Uuid::new_v4();
        let card_id = Uuid::new_v4();

        let mut cards = MockLoyaltyCardRepositoryTrait::new();
        cards
            .expect_get()
            .returning(|b, id| Ok(Some(loyalty_card(b, id, CardStatus::Active))));

        let view = enrollment_view(business_id, customer_id, card_id, 0);
        let view_id = view.id;
        let mut enrollments = MockEnrollmentRepositoryTrait::new();
        enrollments.expect_create().times(1).returning(move |b, c, l| {
            let now = Utc::now();
            Ok(Enrollment {
                id: view_id,
                business_id: b,
                customer_id: c,
                loyalty_card_id: l,
                current_stamps: 0,
                status: EnrollmentStatus::Active,
                total_redeemed: 0,
                wallet_pass_serial: None,
                created_at: now,
                updated_at: now,
            })
        });
        enrollments
            .expect_get_view()
            .returning(move |_, _| Ok(Some(view.clone())));

        let service = EnrollmentService::new(
            Arc::new(customers_in(business_id)),
            Arc::new(cards),
            Arc::new(enrollments),
        );
        let created = service.enroll(business_id, customer_id, card_id).await.unwrap();
        assert_eq!(created.id, view_id);
        assert_eq!(created.current_stamps, 0);
        assert_eq!(created.status, EnrollmentStatus::Active);
    }

    #[tokio::test]
    async fn test_enroll_rejects_archived_card() {
        let business_id = Uuid::new_v4();
        let mut cards = MockLoyaltyCardRepositoryTrait::new();
        cards
            .expect_get()
            .returning(|b, id| Ok(Some(loyalty_card(b, id, CardStatus::Archived))));
        let mut enrollments = MockEnrollmentRepositoryTrait::new();
        enrollments.expect_create().never();

        let service = EnrollmentService::new(
            Arc::new(customers_in(business_id)),
            Arc::new(cards),
            Arc::new(enrollments),
        );
        let err = service
            .enroll(business_id, Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::CardArchived(_)));
    }

    #[tokio::test]
    async fn test_list_for_unknown_customer_is_not_found() {
        let business_id = Uuid::new_v4();
        let mut enrollments = MockEnrollmentRepositoryTrait::new();
        enrollments.expect_list_for_customer().never();

        let service = EnrollmentService::new(
            Arc::new(customers_in(business_id)),
            Arc::new(MockLoyaltyCardRepositoryTrait::new()),
            Arc::new(enrollments),
        );
        let err = service
            .list_for_customer(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::CustomerNotFound(_)));
    }

    #[tokio::test]
    async fn test_remove_missing_enrollment() {
        let mut enrollments = MockEnrollmentRepositoryTrait::new();
        enrollments.expect_delete().returning(|_, _| Ok(None));

        let service = EnrollmentService::new(
            Arc::new(MockCustomerRepositoryTrait::new()),
            Arc::new(MockLoyaltyCardRepositoryTrait::new()),
            Arc::new(enrollments),
        );
        let err = service
            .remove(Uuid::new_v4(), Uuid::new_v4())
            .await
            .unwrap_err();
        assert!(matches!(err, LoyaltyError::EnrollmentNotFound(_)));
    }
}
