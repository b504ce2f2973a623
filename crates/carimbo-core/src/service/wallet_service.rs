//! 电子卡券服务
//!
//! 商家后台的同步操作（发卡 / 刷新 / 撤销），同时作为重试队列的任务执行者。

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use carimbo_shared::cache::Cache;
use carimbo_shared::observability::metrics;

use super::invalidate_customer_cards;
use crate::error::{LoyaltyError, Result};
use crate::models::EnrollmentView;
use crate::repository::{
    BusinessRepositoryTrait, CustomerRepositoryTrait, EnrollmentRepositoryTrait,
};
use crate::wallet::{
    PassHandle, PassPayload, WalletError, WalletJob, WalletJobHandler, WalletPassProvider,
};

pub struct WalletPassService {
    provider: Arc<dyn WalletPassProvider>,
    businesses: Arc<dyn BusinessRepositoryTrait>,
    customers: Arc<dyn CustomerRepositoryTrait>,
    enrollments: Arc<dyn EnrollmentRepositoryTrait>,
    cache: Option<Arc<Cache>>,
}

fn result_label<T>(result: &Result<T>) -> &'static str {
    if result.is_ok() { "success" } else { "error" }
}

impl WalletPassService {
    pub fn new(
        provider: Arc<dyn WalletPassProvider>,
        businesses: Arc<dyn BusinessRepositoryTrait>,
        customers: Arc<dyn CustomerRepositoryTrait>,
        enrollments: Arc<dyn EnrollmentRepositoryTrait>,
    ) -> Self {
        Self {
            provider,
            businesses,
            customers,
            enrollments,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    async fn load_view(&self, business_id: Uuid, enrollment_id: Uuid) -> Result<EnrollmentView> {
        self.enrollments
            .get_view(business_id, enrollment_id)
            .await?
            .ok_or(LoyaltyError::EnrollmentNotFound(enrollment_id))
    }

    async fn payload(&self, serial: String, view: &EnrollmentView) -> Result<PassPayload> {
        let business = self
            .businesses
            .get(view.business_id)
            .await?
            .ok_or(LoyaltyError::BusinessNotFound(view.business_id))?;
        let customer = self
            .customers
            .get(view.business_id, view.customer_id)
            .await?
            .ok_or(LoyaltyError::CustomerNotFound(view.customer_id))?;
        Ok(PassPayload::build(serial, &business, &customer, view))
    }

    /// 为顾客卡片发放电子卡券
    ///
    /// 已有卡券时只刷新内容，返回原序列号
    #[instrument(skip(self))]
    pub async fn issue(&self, business_id: Uuid, enrollment_id: Uuid) -> Result<PassHandle> {
        let result = self.issue_inner(business_id, enrollment_id).await;
        metrics::record_wallet_operation("wallet_issue", result_label(&result));
        result
    }

    async fn issue_inner(&self, business_id: Uuid, enrollment_id: Uuid) -> Result<PassHandle> {
        let view = self.load_view(business_id, enrollment_id).await?;

        if let Some(serial) = view.wallet_pass_serial.clone() {
            let payload = self.payload(serial.clone(), &view).await?;
            self.provider.update_pass(&serial, &payload).await?;
            return Ok(PassHandle { serial, url: None });
        }

        let payload = self
            .payload(PassPayload::serial_for(enrollment_id), &view)
            .await?;
        let handle = self.provider.create_pass(&payload).await?;

        let claimed = self
            .enrollments
            .claim_wallet_serial(business_id, enrollment_id, handle.serial.clone())
            .await?;
        if !claimed {
            return self.resolve_lost_claim(business_id, enrollment_id, handle).await;
        }
        invalidate_customer_cards(self.cache.as_deref(), business_id, view.customer_id).await;

        info!(serial = %handle.serial, "电子卡券已发放");
        Ok(handle)
    }

    /// 并发发卡时另一请求先写入了序列号：保留已写入的卡券，删除本次多建的卡券
    async fn resolve_lost_claim(
        &self,
        business_id: Uuid,
        enrollment_id: Uuid,
        handle: PassHandle,
    ) -> Result<PassHandle> {
        let stored = self
            .enrollments
            .get_view(business_id, enrollment_id)
            .await?
            .and_then(|view| view.wallet_pass_serial);

        if stored.as_deref() == Some(handle.serial.as_str()) {
            return Ok(handle);
        }

        if let Err(e) = self.delete_remote(&handle.serial).await {
            warn!(serial = %handle.serial, error = %e, "删除多余卡券失败");
        }

        match stored {
            Some(serial) => {
                debug!(serial = %serial, "卡券已由并发请求发放");
                Ok(PassHandle { serial, url: None })
            }
            None => Err(LoyaltyError::EnrollmentNotFound(enrollment_id)),
        }
    }

    /// 按最新进度刷新卡券
    #[instrument(skip(self))]
    pub async fn refresh(&self, business_id: Uuid, enrollment_id: Uuid) -> Result<()> {
        let result = async {
            let view = self.load_view(business_id, enrollment_id).await?;
            let serial = view
                .wallet_pass_serial
                .clone()
                .ok_or(LoyaltyError::WalletPassMissing(enrollment_id))?;
            let payload = self.payload(serial.clone(), &view).await?;
            self.provider.update_pass(&serial, &payload).await?;
            Ok(())
        }
        .await;
        metrics::record_wallet_operation("wallet_refresh", result_label(&result));
        result
    }

    /// 撤销卡券；外部已不存在时视为成功
    #[instrument(skip(self))]
    pub async fn revoke(&self, business_id: Uuid, enrollment_id: Uuid) -> Result<()> {
        let result = async {
            let view = self.load_view(business_id, enrollment_id).await?;
            let serial = view
                .wallet_pass_serial
                .clone()
                .ok_or(LoyaltyError::WalletPassMissing(enrollment_id))?;
            self.delete_remote(&serial).await?;
            self.enrollments
                .set_wallet_serial(business_id, enrollment_id, None)
                .await?;
            invalidate_customer_cards(self.cache.as_deref(), business_id, view.customer_id).await;
            info!(serial = %serial, "电子卡券已撤销");
            Ok(())
        }
        .await;
        metrics::record_wallet_operation("wallet_revoke", result_label(&result));
        result
    }

    async fn delete_remote(&self, serial: &str) -> Result<()> {
        match self.provider.delete_pass(serial).await {
            Ok(()) => Ok(()),
            Err(WalletError::NotFound(_)) => {
                warn!(serial, "卡券在外部服务中已不存在");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}

#[async_trait]
impl WalletJobHandler for WalletPassService {
    async fn handle(&self, job: &WalletJob) -> Result<()> {
        match job {
            WalletJob::Refresh {
                business_id,
                enrollment_id,
            } => {
                // 排队期间卡片可能已删除或卡券已撤销
                let Some(view) = self.enrollments.get_view(*business_id, *enrollment_id).await?
                else {
                    debug!(enrollment_id = %enrollment_id, "顾客卡片已不存在，跳过刷新");
                    return Ok(());
                };
                let Some(serial) = view.wallet_pass_serial.clone() else {
                    return Ok(());
                };
                let payload = self.payload(serial.clone(), &view).await?;
                self.provider.update_pass(&serial, &payload).await?;
                Ok(())
            }
            WalletJob::Revoke { serial } => self.delete_remote(serial).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::{
        MockBusinessRepositoryTrait, MockCustomerRepositoryTrait, MockEnrollmentRepositoryTrait,
    };
    use crate::test_fixtures::{business, customer, enrollment_view};
    use crate::wallet::MockWalletPassProvider;

    struct Fixture {
        provider: MockWalletPassProvider,
        enrollments: MockEnrollmentRepositoryTrait,
        business_id: Uuid,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                provider: MockWalletPassProvider::new(),
                enrollments: MockEnrollmentRepositoryTrait::new(),
                business_id: Uuid::new_v4(),
            }
        }

        fn service(self) -> WalletPassService {
            let mut businesses = MockBusinessRepositoryTrait::new();
            businesses
                .expect_get()
                .returning(|id| Ok(Some(business(id))));
            let mut customers = MockCustomerRepositoryTrait::new();
            customers
                .expect_get()
                .returning(|b, id| Ok(Some(customer(b, id))));
            WalletPassService::new(
                Arc::new(self.provider),
                Arc::new(businesses),
                Arc::new(customers),
                Arc::new(self.enrollments),
            )
        }
    }

    fn view_with_serial(business_id: Uuid, serial: Option<&str>) -> EnrollmentView {
        let mut view = enrollment_view(business_id, Uuid::new_v4(), Uuid::new_v4(), 7);
        view.wallet_pass_serial = serial.map(String::from);
        view
    }

    #[tokio::test]
    async fn test_issue_creates_pass_and_stores_serial() {
        let mut fx = Fixture::new();
        let view = view_with_serial(fx.business_id, None);
        let enrollment_id = view.id;

        fx.enrollments
            .expect_get_view()
            .returning(move |_, _| Ok(Some(view.clone())));
        fx.provider
            .expect_create_pass()
            .withf(|p| p.progress == "7/10" && p.business_name == "Cantina da Nona")
            .returning(|p| {
                Ok(PassHandle {
                    serial: p.serial.clone(),
                    url: Some("https://wallet.example/p/1".to_string()),
                })
            });
        let expected = PassPayload::serial_for(enrollment_id);
        fx.enrollments
            .expect_claim_wallet_serial()
            .withf(move |_, id, serial| *id == enrollment_id && *serial == expected)
            .times(1)
            .returning(|_, _, _| Ok(true));

        let business_id = fx.business_id;
        let handle = fx.service().issue(business_id, enrollment_id).await.unwrap();
        assert_eq!(handle.serial, PassPayload::serial_for(enrollment_id));
    }

    #[tokio::test]
    async fn test_issue_existing_pass_updates() {
        let mut fx = Fixture::new();
        let view = view_with_serial(fx.business_id, Some("carimbo-abc"));
        let enrollment_id = view.id;

        fx.enrollments
            .expect_get_view()
            .returning(move |_, _| Ok(Some(view.clone())));
        fx.provider.expect_create_pass().never();
        fx.provider
            .expect_update_pass()
            .withf(|serial, _| serial == "carimbo-abc")
            .times(1)
            .returning(|_, _| Ok(()));

        let business_id = fx.business_id;
        let handle = fx.service().issue(business_id, enrollment_id).await.unwrap();
        assert_eq!(handle.serial, "carimbo-abc");
    }

    #[tokio::test]
    async fn test_concurrent_issue_keeps_stored_pass_and_deletes_extra() {
        let mut fx = Fixture::new();
        let view = view_with_serial(fx.business_id, None);
        let enrollment_id = view.id;
        let mut stored = view.clone();
        stored.wallet_pass_serial = Some("carimbo-first".to_string());

        let mut seq = mockall::Sequence::new();
        fx.enrollments
            .expect_get_view()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(Some(view.clone())));
        fx.enrollments
            .expect_get_view()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(Some(stored.clone())));
        fx.provider.expect_create_pass().returning(|_| {
            Ok(PassHandle {
                serial: "carimbo-second".to_string(),
                url: None,
            })
        });
        fx.enrollments
            .expect_claim_wallet_serial()
            .times(1)
            .returning(|_, _, _| Ok(false));
        fx.provider
            .expect_delete_pass()
            .withf(|serial| serial == "carimbo-second")
            .times(1)
            .returning(|_| Ok(()));

        let business_id = fx.business_id;
        let handle = fx.service().issue(business_id, enrollment_id).await.unwrap();
        assert_eq!(handle.serial, "carimbo-first");
    }

    #[tokio::test]
    async fn test_concurrent_issue_with_same_serial_keeps_pass() {
        let mut fx = Fixture::new();
        let view = view_with_serial(fx.business_id, None);
        let enrollment_id = view.id;
        let serial = PassPayload::serial_for(enrollment_id);
        let mut stored = view.clone();
        stored.wallet_pass_serial = Some(serial.clone());

        let mut seq = mockall::Sequence::new();
        fx.enrollments
            .expect_get_view()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(Some(view.clone())));
        fx.enrollments
            .expect_get_view()
            .times(1)
            .in_sequence(&mut seq)
            .returning(move |_, _| Ok(Some(stored.clone())));
        fx.provider.expect_create_pass().returning(|p| {
            Ok(PassHandle {
                serial: p.serial.clone(),
                url: None,
            })
        });
        fx.enrollments
            .expect_claim_wallet_serial()
            .returning(|_, _, _| Ok(false));
        fx.provider.expect_delete_pass().never();

        let business_id = fx.business_id;
        let handle = fx.service().issue(business_id, enrollment_id).await.unwrap();
        assert_eq!(handle.serial, serial);
    }

    #[tokio::test]
    async fn test_refresh_without_pass() {
        let mut fx = Fixture::new();
        let view = view_with_serial(fx.business_id, None);
        let enrollment_id = view.id;
        fx.enrollments
            .expect_get_view()
            .returning(move |_, _| Ok(Some(view.clone())));

        let business_id = fx.business_id;
        let err = fx.service().refresh(business_id, enrollment_id).await.unwrap_err();
        assert!(matches!(err, LoyaltyError::WalletPassMissing(_)));
    }

    #[tokio::test]
    async fn test_revoke_tolerates_missing_remote_pass() {
        let mut fx = Fixture::new();
        let view = view_with_serial(fx.business_id, Some("carimbo-gone"));
        let enrollment_id = view.id;
        fx.enrollments
            .expect_get_view()
            .returning(move |_, _| Ok(Some(view.clone())));
        fx.provider
            .expect_delete_pass()
            .returning(|serial| Err(WalletError::NotFound(serial.to_string())));
        fx.enrollments
            .expect_set_wallet_serial()
            .withf(|_, _, serial| serial.is_none())
            .times(1)
            .returning(|_, _, _| Ok(true));

        let business_id = fx.business_id;
        fx.service().revoke(business_id, enrollment_id).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_job_skips_deleted_enrollment() {
        let mut fx = Fixture::new();
        fx.enrollments.expect_get_view().returning(|_, _| Ok(None));
        fx.provider.expect_update_pass().never();

        let job = WalletJob::Refresh {
            business_id: fx.business_id,
            enrollment_id: Uuid::new_v4(),
        };
        fx.service().handle(&job).await.unwrap();
    }

    #[tokio::test]
    async fn test_refresh_job_propagates_transient_error() {
        let mut fx = Fixture::new();
        let view = view_with_serial(fx.business_id, Some("carimbo-abc"));
        fx.enrollments
            .expect_get_view()
            .returning(move |_, _| Ok(Some(view.clone())));
        fx.provider
            .expect_update_pass()
            .returning(|_, _| Err(WalletError::Unavailable("503".to_string())));

        let job = WalletJob::Refresh {
            business_id: fx.business_id,
            enrollment_id: Uuid::new_v4(),
        };
        let err = fx.service().handle(&job).await.unwrap_err();
        assert!(err.is_retryable());
    }
}
