//! 顾客服务

use std::sync::Arc;

use tracing::{info, instrument};
use uuid::Uuid;

use carimbo_shared::cache::Cache;

use super::dto::CreateCustomerCommand;
use super::invalidate_customer_cards;
use crate::error::{LoyaltyError, Result};
use crate::models::{Customer, CustomerChanges, NewCustomer, normalize_phone};
use crate::repository::CustomerRepositoryTrait;

pub struct CustomerService {
    customers: Arc<dyn CustomerRepositoryTrait>,
    cache: Option<Arc<Cache>>,
}

/// 手机号规范化，空串视为未填写
fn parse_phone(raw: Option<String>) -> Result<Option<String>> {
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => normalize_phone(value)
            .map(Some)
            .ok_or_else(|| LoyaltyError::Validation(format!("手机号格式不正确: {}", value))),
    }
}

impl CustomerService {
    pub fn new(customers: Arc<dyn CustomerRepositoryTrait>) -> Self {
        Self {
            customers,
            cache: None,
        }
    }

    pub fn with_cache(mut self, cache: Arc<Cache>) -> Self {
        self.cache = Some(cache);
        self
    }

    pub async fn get(&self, business_id: Uuid, id: Uuid) -> Result<Customer> {
        self.customers
            .get(business_id, id)
            .await?
            .ok_or(LoyaltyError::CustomerNotFound(id))
    }

    pub async fn list(
        &self,
        business_id: Uuid,
        search: Option<String>,
        limit: i64,
        offset: i64,
    ) -> Result<(Vec<Customer>, i64)> {
        self.customers.list(business_id, search, limit, offset).await
    }

    #[instrument(skip(self, command), fields(business_id = %business_id))]
    pub async fn create(&self, business_id: Uuid, command: CreateCustomerCommand) -> Result<Customer> {
        let name = command.name.trim().to_string();
        if name.is_empty() {
            return Err(LoyaltyError::Validation("顾客姓名不能为空".to_string()));
        }

        let customer = self
            .customers
            .create(&NewCustomer {
                business_id,
                name,
                phone: parse_phone(command.phone)?,
                email: command.email.filter(|e| !e.trim().is_empty()),
                birthday: command.birthday,
                notes: command.notes,
            })
            .await?;

        info!(customer_id = %customer.id, "顾客已创建");
        Ok(customer)
    }

    pub async fn update(
        &self,
        business_id: Uuid,
        id: Uuid,
        mut changes: CustomerChanges,
    ) -> Result<Customer> {
        if let Some(name) = &changes.name
            && name.trim().is_empty()
        {
            return Err(LoyaltyError::Validation("顾客姓名不能为空".to_string()));
        }
        changes.phone = parse_phone(changes.phone)?;

        self.customers
            .update(business_id, id, &changes)
            .await?
            .ok_or(LoyaltyError::CustomerNotFound(id))
    }

    /// 删除顾客（其卡片与流水级联删除）
    #[instrument(skip(self))]
    pub async fn delete(&self, business_id: Uuid, id: Uuid) -> Result<()> {
        if !self.customers.delete(business_id, id).await? {
            return Err(LoyaltyError::CustomerNotFound(id));
        }
        invalidate_customer_cards(self.cache.as_deref(), business_id, id).await;
        info!(customer_id = %id, "顾客已删除");
        Ok(())
    }
}
