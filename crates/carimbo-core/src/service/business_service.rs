//! 商家资料与设置

use std::sync::Arc;

use uuid::Uuid;

use crate::error::{LoyaltyError, Result};
use crate::models::{Business, BusinessChanges};
use crate::repository::BusinessRepositoryTrait;

/// 合法的 UTC 偏移范围（分钟）
const MIN_UTC_OFFSET_MINUTES: i32 = -12 * 60;
const MAX_UTC_OFFSET_MINUTES: i32 = 14 * 60;

pub struct BusinessService {
    businesses: Arc<dyn BusinessRepositoryTrait>,
}

impl BusinessService {
    pub fn new(businesses: Arc<dyn BusinessRepositoryTrait>) -> Self {
        Self { businesses }
    }

    pub async fn get(&self, id: Uuid) -> Result<Business> {
        self.businesses
            .get(id)
            .await?
            .ok_or(LoyaltyError::BusinessNotFound(id))
    }

    pub async fn update(&self, id: Uuid, changes: BusinessChanges) -> Result<Business> {
        if let Some(name) = &changes.name
            && name.trim().is_empty()
        {
            return Err(LoyaltyError::Validation("商家名称不能为空".to_string()));
        }
        if let Some(settings) = &changes.settings
            && !(MIN_UTC_OFFSET_MINUTES..=MAX_UTC_OFFSET_MINUTES)
                .contains(&settings.utc_offset_minutes)
        {
            return Err(LoyaltyError::Validation(format!(
                "utcOffsetMinutes 超出范围: {}",
                settings.utc_offset_minutes
            )));
        }

        self.businesses
            .update(id, &changes)
            .await?
            .ok_or(LoyaltyError::BusinessNotFound(id))
    }
}
