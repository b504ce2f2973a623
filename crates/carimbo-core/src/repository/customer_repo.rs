//! 顾客仓储

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use super::is_unique_violation;
use super::traits::CustomerRepositoryTrait;
use crate::error::{LoyaltyError, Result};
use crate::models::{Customer, CustomerChanges, NewCustomer};

const CUSTOMER_COLUMNS: &str =
    "id, business_id, name, phone, email, birthday, notes, created_at, updated_at";

pub struct CustomerRepository {
    pool: PgPool,
}

impl CustomerRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

/// 手机号唯一约束冲突转为业务错误
fn map_phone_conflict(err: sqlx::Error, phone: Option<&str>) -> LoyaltyError {
    if is_unique_violation(&err) {
        LoyaltyError::DuplicatePhone(phone.unwrap_or_default().to_string())
    } else {
        LoyaltyError::Database(err)
    }
}

#[async_trait]
impl CustomerRepositoryTrait for CustomerRepository {
    async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Option<Customer>> {
        let sql = format!(
            "SELECT {} FROM customers WHERE id = $1 AND business_id = $2",
            CUSTOMER_COLUMNS
        );
        let customer = sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .bind(business_id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(customer)
    }

    async fn list(
        &self,
        business_id: Uuid,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Customer>, i64)> {
        let pattern = search
            .filter(|s| !s.trim().is_empty())
            .map(|s| format!("%{}%", s.trim()));

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM customers
            WHERE business_id = $1
              AND ($2::TEXT IS NULL OR name ILIKE $2 OR phone LIKE $2)
            "#,
        )
        .bind(business_id)
        .bind(&pattern)
        .fetch_one(&self.pool)
        .await?;

        let sql = format!(
            r#"
            SELECT {}
            FROM customers
            WHERE business_id = $1
              AND ($2::TEXT IS NULL OR name ILIKE $2 OR phone LIKE $2)
            ORDER BY created_at DESC
            LIMIT $3 OFFSET $4
            "#,
            CUSTOMER_COLUMNS
        );
        let customers = sqlx::query_as::<_, Customer>(&sql)
            .bind(business_id)
            .bind(&pattern)
            .bind(limit)
            .bind(offset)
            .fetch_all(&self.pool)
            .await?;

        Ok((customers, total))
    }

    async fn create(&self, customer: &NewCustomer) -> Result<Customer> {
        let sql = format!(
            r#"
            INSERT INTO customers (id, business_id, name, phone, email, birthday, notes)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        sqlx::query_as::<_, Customer>(&sql)
            .bind(Uuid::now_v7())
            .bind(customer.business_id)
            .bind(&customer.name)
            .bind(&customer.phone)
            .bind(&customer.email)
            .bind(customer.birthday)
            .bind(&customer.notes)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| map_phone_conflict(e, customer.phone.as_deref()))
    }

    async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        changes: &CustomerChanges,
    ) -> Result<Option<Customer>> {
        let sql = format!(
            r#"
            UPDATE customers
            SET name = COALESCE($3, name),
                phone = COALESCE($4, phone),
                email = COALESCE($5, email),
                birthday = COALESCE($6, birthday),
                notes = COALESCE($7, notes),
                updated_at = NOW()
            WHERE id = $1 AND business_id = $2
            RETURNING {}
            "#,
            CUSTOMER_COLUMNS
        );
        sqlx::query_as::<_, Customer>(&sql)
            .bind(id)
            .bind(business_id)
            .bind(&changes.name)
            .bind(&changes.phone)
            .bind(&changes.email)
            .bind(changes.birthday)
            .bind(&changes.notes)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| map_phone_conflict(e, changes.phone.as_deref()))
    }

    async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM customers WHERE id = $1 AND business_id = $2")
            .bind(id)
            .bind(business_id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}
