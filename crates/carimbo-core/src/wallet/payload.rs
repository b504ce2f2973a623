use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Business, Customer, EnrollmentView};

/// 卡券内容
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PassPayload {
    pub serial: String,
    pub business_name: String,
    pub card_name: String,
    pub customer_name: String,
    /// 进度文本，如 "7/10"
    pub progress: String,
    pub current_stamps: i32,
    pub stamps_required: i32,
    pub reward_description: String,
    pub total_redeemed: i32,
    pub background_color: String,
    pub foreground_color: String,
    pub label_color: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub logo_url: Option<String>,
    pub stamp_icon: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expires_at: Option<DateTime<Utc>>,
}

impl PassPayload {
    /// 新卡券的序列号，由顾客卡片 ID 派生
    pub fn serial_for(enrollment_id: Uuid) -> String {
        format!("carimbo-{}", enrollment_id.simple())
    }

    pub fn build(
        serial: String,
        business: &Business,
        customer: &Customer,
        enrollment: &EnrollmentView,
    ) -> Self {
        let design = &enrollment.design;
        Self {
            serial,
            business_name: business.name.clone(),
            card_name: enrollment.card_name.clone(),
            customer_name: customer.name.clone(),
            progress: enrollment.progress_label(),
            current_stamps: enrollment.current_stamps,
            stamps_required: enrollment.rules.stamps_required,
            reward_description: enrollment.rules.reward_description.clone(),
            total_redeemed: enrollment.total_redeemed,
            background_color: design.background_color.clone(),
            foreground_color: design.foreground_color.clone(),
            label_color: design.label_color.clone(),
            logo_url: design.logo_url.clone(),
            stamp_icon: design.stamp_icon.clone(),
            expires_at: enrollment.expires_at(),
        }
    }
}
