//! 顾客卡片仓储
//!
//! 集点写入使用 `SELECT ... FOR UPDATE` 锁定顾客卡片行，
//! 同一张卡片的并发集点在数据库层串行执行，不会丢失更新。

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgConnection, PgPool};
use tracing::{debug, instrument};
use uuid::Uuid;

use super::is_unique_violation;
use super::traits::{AccrualRecord, AccrualRequest, EnrollmentRepositoryTrait};
use crate::accrual::{EnrollmentProgress, apply_stamps, check_daily_limit, enrollment_expires_at};
use crate::error::{LoyaltyError, Result};
use crate::models::{
    BusinessSettings, Enrollment, EnrollmentStatus, EnrollmentView, LoyaltyCardRules,
};

const ENROLLMENT_COLUMNS: &str = "id, business_id, customer_id, loyalty_card_id, current_stamps, \
     status, total_redeemed, wallet_pass_serial, created_at, updated_at";

const VIEW_SELECT: &str = r#"
    SELECT cc.id, cc.business_id, cc.customer_id, cc.loyalty_card_id,
           lc.name AS card_name, lc.status AS card_status, lc.rules, lc.design,
           cc.current_stamps, cc.status, cc.total_redeemed, cc.wallet_pass_serial,
           cc.created_at, cc.updated_at
    FROM customer_cards cc
    JOIN loyalty_cards lc ON lc.id = cc.loyalty_card_id
"#;

/// 加锁读取的顾客卡片（含规则与商家设置）
#[derive(sqlx::FromRow)]
struct LockedEnrollmentRow {
    id: Uuid,
    customer_id: Uuid,
    loyalty_card_id: Uuid,
    current_stamps: i32,
    status: EnrollmentStatus,
    total_redeemed: i32,
    wallet_pass_serial: Option<String>,
    created_at: DateTime<Utc>,
    #[sqlx(json)]
    rules: LoyaltyCardRules,
    #[sqlx(json)]
    settings: BusinessSettings,
}

pub struct EnrollmentRepository {
    pool: PgPool,
}

impl EnrollmentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// 在事务中锁定顾客卡片行
    async fn lock_for_accrual(
        tx: &mut PgConnection,
        business_id: Uuid,
        enrollment_id: Uuid,
    ) -> Result<Option<LockedEnrollmentRow>> {
        let row = sqlx::query_as::<_, LockedEnrollmentRow>(
            r#"
            SELECT cc.id, cc.customer_id, cc.loyalty_card_id, cc.current_stamps, cc.status,
                   cc.total_redeemed, cc.wallet_pass_serial, cc.created_at,
                   lc.rules, b.settings
            FROM customer_cards cc
            JOIN loyalty_cards lc ON lc.id = cc.loyalty_card_id
            JOIN businesses b ON b.id = cc.business_id
            WHERE cc.id = $1 AND cc.business_id = $2
            FOR UPDATE OF cc
            "#,
        )
        .bind(enrollment_id)
        .bind(business_id)
        .fetch_optional(&mut *tx)
        .await?;

        Ok(row)
    }

    /// 当地自然日内已计入的点数
    async fn stamps_granted_since(
        tx: &mut PgConnection,
        enrollment_id: Uuid,
        since: DateTime<Utc>,
    ) -> Result<i64> {
        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(stamps_applied), 0)::BIGINT
            FROM stamp_transactions
            WHERE enrollment_id = $1 AND created_at >= $2
            "#,
        )
        .bind(enrollment_id)
        .bind(since)
        .fetch_one(&mut *tx)
        .await?;

        Ok(total)
    }
}

#[async_trait]
impl EnrollmentRepositoryTrait for EnrollmentRepository {
    async fn list_for_customer(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
    ) -> Result<Vec<EnrollmentView>> {
        let sql = format!(
            "{} WHERE cc.business_id = $1 AND cc.customer_id = $2 ORDER BY cc.created_at",
            VIEW_SELECT
        );
        let views = sqlx::query_as::<_, EnrollmentView>(&sql)
            .bind(business_id)
            .bind(customer_id)
            .fetch_all(&self.pool)
            .await?;

        Ok(views)
    }

    async fn get_view(&self, business_id: Uuid, id: Uuid) -> Result<Option<EnrollmentView>> {
        let sql = format!("{} WHERE cc.id = $1 AND cc.business_id = $2", VIEW_SELECT);
        let view = sqlx::query_as::<_, EnrollmentView>(&sql)
            .bind(id)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(view)
    }

    async fn create(
        &self,
        business_id: Uuid,
        customer_id: Uuid,
        loyalty_card_id: Uuid,
    ) -> Result<Enrollment> {
        let fresh = EnrollmentProgress::fresh();
        let sql = format!(
            r#"
            INSERT INTO customer_cards
                (id, business_id, customer_id, loyalty_card_id, current_stamps, status, total_redeemed)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            ENROLLMENT_COLUMNS
        );
        sqlx::query_as::<_, Enrollment>(&sql)
            .bind(Uuid::now_v7())
            .bind(business_id)
            .bind(customer_id)
            .bind(loyalty_card_id)
            .bind(fresh.current_stamps)
            .bind(fresh.status)
            .bind(fresh.total_redeemed)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                if is_unique_violation(&e) {
                    LoyaltyError::AlreadyEnrolled {
                        customer_id,
                        loyalty_card_id,
                    }
                } else {
                    LoyaltyError::Database(e)
                }
            })
    }

    async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<Option<Enrollment>> {
        let sql = format!(
            "DELETE FROM customer_cards WHERE id = $1 AND business_id = $2 RETURNING {}",
            ENROLLMENT_COLUMNS
        );
        let deleted = sqlx::query_as::<_, Enrollment>(&sql)
            .bind(id)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(deleted)
    }

    async fn set_wallet_serial(
        &self,
        business_id: Uuid,
        id: Uuid,
        serial: Option<String>,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE customer_cards
            SET wallet_pass_serial = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            "#,
        )
        .bind(id)
        .bind(business_id)
        .bind(serial)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn claim_wallet_serial(
        &self,
        business_id: Uuid,
        id: Uuid,
        serial: String,
    ) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE customer_cards
            SET wallet_pass_serial = $3, updated_at = NOW()
            WHERE id = $1 AND business_id = $2 AND wallet_pass_serial IS NULL
            "#,
        )
        .bind(id)
        .bind(business_id)
        .bind(serial)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), fields(enrollment_id = %request.enrollment_id))]
    async fn accrue(&self, request: &AccrualRequest) -> Result<AccrualRecord> {
        // 任何一步出错时 tx 被 drop，事务自动回滚
        let mut tx = self.pool.begin().await?;

        let row = Self::lock_for_accrual(&mut tx, request.business_id, request.enrollment_id)
            .await?
            .ok_or(LoyaltyError::EnrollmentNotFound(request.enrollment_id))?;

        row.rules.validate().map_err(LoyaltyError::Internal)?;

        if let Some(expires_at) = enrollment_expires_at(row.created_at, row.rules.expiry_days)
            && request.now >= expires_at
        {
            return Err(LoyaltyError::EnrollmentExpired(row.id));
        }

        if row.rules.max_stamps_per_day.is_some() {
            let day_start = row.settings.local_day_start(request.now);
            let granted_today = Self::stamps_granted_since(&mut tx, row.id, day_start).await?;
            check_daily_limit(row.rules.max_stamps_per_day, granted_today, request.increment)?;
        }

        let before = EnrollmentProgress {
            current_stamps: row.current_stamps,
            status: row.status,
            total_redeemed: row.total_redeemed,
        };
        let outcome = apply_stamps(&before, row.rules.stamps_required, request.increment);

        sqlx::query(
            r#"
            UPDATE customer_cards
            SET current_stamps = $2, status = $3, total_redeemed = $4, updated_at = NOW()
            WHERE id = $1
            "#,
        )
        .bind(row.id)
        .bind(outcome.new_stamp_count)
        .bind(outcome.new_status)
        .bind(outcome.new_total_redeemed)
        .execute(&mut *tx)
        .await?;

        let transaction_id = Uuid::now_v7();
        sqlx::query(
            r#"
            INSERT INTO stamp_transactions
                (id, business_id, enrollment_id, customer_id, loyalty_card_id,
                 stamps_requested, stamps_applied, stamps_after, completed, note, created_by, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            "#,
        )
        .bind(transaction_id)
        .bind(request.business_id)
        .bind(row.id)
        .bind(row.customer_id)
        .bind(row.loyalty_card_id)
        .bind(request.increment.get())
        .bind(outcome.stamps_applied)
        .bind(outcome.new_stamp_count)
        .bind(outcome.completed_now)
        .bind(&request.note)
        .bind(request.created_by)
        .bind(request.now)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        debug!(
            stamps_after = outcome.new_stamp_count,
            completed_now = outcome.completed_now,
            "集点已写入"
        );

        Ok(AccrualRecord {
            enrollment_id: row.id,
            customer_id: row.customer_id,
            loyalty_card_id: row.loyalty_card_id,
            stamps_required: row.rules.stamps_required,
            outcome,
            transaction_id,
            wallet_pass_serial: row.wallet_pass_serial,
        })
    }
}
