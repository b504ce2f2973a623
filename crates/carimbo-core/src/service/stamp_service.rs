//! 集点发放服务
//!
//! ## 发放流程
//!
//! 1. 校验点数 -> 2. 按租户加载顾客 -> 3. 选卡（多卡未指定时拒绝）
//!    -> 4. 事务写入（行锁、有效期、每日上限、集点计算、流水）
//!    -> 5. 清除顾客卡片缓存（失败不影响主流程）
//!    -> 6. 已发卡券时入队刷新（失败不影响主流程）
//!    -> 7. 记录指标

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use carimbo_shared::cache::Cache;
use carimbo_shared::observability::metrics;

use super::dto::{GrantStampsCommand, GrantStampsResult};
use super::invalidate_customer_cards;
use crate::accrual::{StampIncrement, select_enrollment};
use crate::error::{LoyaltyError, Result};
use crate::models::StampTransaction;
use crate::repository::{
    AccrualRequest, CustomerRepositoryTrait, EnrollmentRepositoryTrait,
    StampTransactionRepositoryTrait,
};
use crate::wallet::{WalletJob, WalletRetryQueue};

pub struct StampService {
    customers: Arc<dyn CustomerRepositoryTrait>,
    enrollments: Arc<dyn EnrollmentRepositoryTrait>,
    transactions: Arc<dyn StampTransactionRepositoryTrait>,
    cache: Option<Arc<Cache>>,
    wallet_queue: Option<WalletRetryQueue>,
    max_increment: i32,
}

impl StampService {
    pub fn new(
        customers: Arc<dyn CustomerRepositoryTrait>,
        enrollments: Arc<dyn EnrollmentRepositoryTrait>,
        transactions: Arc<dyn StampTransactionRepositoryTrait>,
        max_increment: i32,
    ) -> Self {
        Self {
            customers,
            enrollments,
            transactions,
            cache: None,
            wallet_queue: None,
            max_increment,
        }
    }

    pub fn with_cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub fn with_wallet_queue(mut self, queue: WalletRetryQueue) -> Self {
        self.wallet_queue = Some(queue);
        self
    }

    /// 给顾客发放集点
    #[instrument(skip(self, command), fields(business_id = %business_id, customer_id = %command.customer_id))]
    pub async fn grant_stamps(
        &self,
        business_id: Uuid,
        command: GrantStampsCommand,
    ) -> Result<GrantStampsResult> {
        let started = Instant::now();
        let result = self.grant_stamps_internal(business_id, command).await;
        let elapsed = started.elapsed().as_secs_f64();

        match &result {
            Ok(r) => metrics::record_stamp_grant(
                r.stamps_applied.max(0) as u64,
                r.completed_now,
                "success",
                elapsed,
            ),
            Err(e) if e.is_business_error() => {
                metrics::record_stamp_grant(0, false, "rejected", elapsed)
            }
            Err(_) => metrics::record_stamp_grant(0, false, "error", elapsed),
        }

        result
    }

    async fn grant_stamps_internal(
        &self,
        business_id: Uuid,
        command: GrantStampsCommand,
    ) -> Result<GrantStampsResult> {
        // 1. 校验点数
        let increment = StampIncrement::new(command.stamps, self.max_increment)
            .map_err(LoyaltyError::Validation)?;

        // 2. 顾客必须属于当前商家
        let customer_id = command.customer_id;
        self.customers
            .get(business_id, customer_id)
            .await?
            .ok_or(LoyaltyError::CustomerNotFound(customer_id))?;

        // 3. 选卡
        let enrollments = self
            .enrollments
            .list_for_customer(business_id, customer_id)
            .await?;
        let selected = select_enrollment(&enrollments, command.loyalty_card_id)
            .map_err(|e| LoyaltyError::from_selection(customer_id, e))?;

        // 4. 事务写入
        let record = self
            .enrollments
            .accrue(&AccrualRequest {
                business_id,
                enrollment_id: selected.id,
                increment,
                now: Utc::now(),
                note: command.note,
                created_by: command.operator,
            })
            .await?;

        // 5. 缓存失效
        invalidate_customer_cards(self.cache.as_deref(), business_id, customer_id).await;

        // 6. 卡券刷新
        if record.wallet_pass_serial.is_some()
            && let Some(queue) = &self.wallet_queue
            && !queue.enqueue(WalletJob::Refresh {
                business_id,
                enrollment_id: record.enrollment_id,
            })
        {
            warn!(enrollment_id = %record.enrollment_id, "卡券刷新任务入队失败");
        }

        let outcome = record.outcome;
        info!(
            enrollment_id = %record.enrollment_id,
            requested = increment.get(),
            applied = outcome.stamps_applied,
            current_stamps = outcome.new_stamp_count,
            completed_now = outcome.completed_now,
            "集点发放成功"
        );

        Ok(GrantStampsResult {
            ok: true,
            current_stamps: outcome.new_stamp_count,
            status: outcome.new_status,
            total_redeemed: outcome.new_total_redeemed,
            completed_now: outcome.completed_now,
            loyalty_card_id: record.loyalty_card_id,
            enrollment_id: record.enrollment_id,
            stamps_applied: outcome.stamps_applied,
            stamps_required: record.stamps_required,
        })
    }

    /// 顾客集点流水（分页）
    pub async fn history(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<StampTransaction>, i64)> {
        self.customers
            .get(business_id, customer_id)
            .await?
            .ok_or(LoyaltyError::CustomerNotFound(customer_id))?;

        self.transactions
            .list_for_customer(business_id, customer_id, limit, offset)
            .await
    }
}
