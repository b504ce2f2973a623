//! 单元测试用数据构造

use chrono::Utc;
use uuid::Uuid;

use crate::accrual::{AccrualOutcome, EnrollmentProgress, StampIncrement, apply_stamps};
use crate::models::{
    Business, BusinessSettings, CardDesign, CardStatus, Customer, EnrollmentStatus,
    EnrollmentView, LoyaltyCard, LoyaltyCardRules,
};
use crate::repository::{AccrualRecord, AccrualRequest};

pub fn business(id: Uuid) -> Business {
    let now = Utc::now();
    Business {
        id,
        name: "Cantina da Nona".to_string(),
        slug: "cantina-da-nona".to_string(),
        phone: None,
        address: None,
        settings: BusinessSettings::default(),
        created_at: now,
        updated_at: now,
    }
}

pub fn customer(business_id: Uuid, id: Uuid) -> Customer {
    let now = Utc::now();
    Customer {
        id,
        business_id,
        name: "Maria Souza".to_string(),
        phone: Some("5511987654321".to_string()),
        email: None,
        birthday: None,
        notes: None,
        created_at: now,
        updated_at: now,
    }
}

pub fn rules(stamps_required: i32) -> LoyaltyCardRules {
    LoyaltyCardRules {
        stamps_required,
        reward_description: "1 pizza grátis".to_string(),
        max_stamps_per_day: None,
        expiry_days: None,
    }
}

pub fn loyalty_card(business_id: Uuid, id: Uuid, status: CardStatus) -> LoyaltyCard {
    let now = Utc::now();
    LoyaltyCard {
        id,
        business_id,
        name: "Cartão Pizza".to_string(),
        description: None,
        rules: rules(10),
        design: CardDesign::default(),
        status,
        created_at: now,
        updated_at: now,
    }
}

pub fn enrollment_view(
    business_id: Uuid,
    customer_id: Uuid,
    loyalty_card_id: Uuid,
    current_stamps: i32,
) -> EnrollmentView {
    let now = Utc::now();
    EnrollmentView {
        id: Uuid::new_v4(),
        business_id,
        customer_id,
        loyalty_card_id,
        card_name: "Cartão Pizza".to_string(),
        card_status: CardStatus::Active,
        rules: rules(10),
        design: CardDesign::default(),
        current_stamps,
        status: EnrollmentStatus::Active,
        total_redeemed: 0,
        wallet_pass_serial: None,
        created_at: now,
        updated_at: now,
    }
}

/// 模拟仓储 accrue：对给定进度执行真实的集点计算
pub fn accrual_record(
    view: &EnrollmentView,
    request: &AccrualRequest,
    before: EnrollmentProgress,
) -> AccrualRecord {
    let outcome: AccrualOutcome =
        apply_stamps(&before, view.rules.stamps_required, request.increment);
    AccrualRecord {
        enrollment_id: view.id,
        customer_id: view.customer_id,
        loyalty_card_id: view.loyalty_card_id,
        stamps_required: view.rules.stamps_required,
        outcome,
        transaction_id: Uuid::new_v4(),
        wallet_pass_serial: view.wallet_pass_serial.clone(),
    }
}

pub fn increment(n: i64) -> StampIncrement {
    StampIncrement::new(n, 50).unwrap()
}
