//! 选卡策略
//!
//! 未指定集点卡时：顾客在该商家只有一张卡则直接使用，有多张则拒绝并要求明确指定。

use uuid::Uuid;

use crate::models::EnrollmentView;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SelectionError {
    /// 顾客在该商家没有任何卡片
    NoEnrollment,
    /// 指定的集点卡顾客未加入
    CardNotEnrolled(Uuid),
    /// 顾客有多张卡片且未指定，附带候选集点卡 ID
    Ambiguous(Vec<Uuid>),
}

/// 选择要集点的卡片
///
/// enrollments 须已按商家和顾客过滤。不论卡片状态，多于一张即视为歧义。
pub fn select_enrollment(
    enrollments: &[EnrollmentView],
    loyalty_card_id: Option<Uuid>,
) -> Result<&EnrollmentView, SelectionError> {
    match loyalty_card_id {
        Some(card_id) => enrollments
            .iter()
            .find(|e| e.loyalty_card_id == card_id)
            .ok_or(SelectionError::CardNotEnrolled(card_id)),
        None => match enrollments {
            [] => Err(SelectionError::NoEnrollment),
            [only] => Ok(only),
            many => Err(SelectionError::Ambiguous(
                many.iter().map(|e| e.loyalty_card_id).collect(),
            )),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CardDesign, CardStatus, EnrollmentStatus, LoyaltyCardRules};
    use chrono::Utc;

    fn enrollment(card_id: Uuid) -> EnrollmentView {
        let now = Utc::now();
        EnrollmentView {
            id: Uuid::new_v4(),
            business_id: Uuid::nil(),
            customer_id: Uuid::nil(),
            loyalty_card_id: card_id,
            card_name: "Cartão".to_string(),
            card_status: CardStatus::Active,
            rules: LoyaltyCardRules {
                stamps_required: 10,
                reward_description: String::new(),
                max_stamps_per_day: None,
                expiry_days: None,
            },
            design: CardDesign::default(),
            current_stamps: 0,
            status: EnrollmentStatus::Active,
            total_redeemed: 0,
            wallet_pass_serial: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_single_enrollment_is_selected() {
        let card = Uuid::new_v4();
        let list = vec![enrollment(card)];
        assert_eq!(select_enrollment(&list, None).unwrap().loyalty_card_id, card);
    }

    #[test]
    fn test_no_enrollment() {
        assert_eq!(
            select_enrollment(&[], None).unwrap_err(),
            SelectionError::NoEnrollment
        );
    }

    #[test]
    fn test_multiple_without_card_is_ambiguous() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let list = vec![enrollment(a), enrollment(b)];
        match select_enrollment(&list, None) {
            Err(SelectionError::Ambiguous(ids)) => assert_eq!(ids, vec![a, b]),
            other => panic!("expected ambiguity, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_card() {
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let list = vec![enrollment(a), enrollment(b)];
        assert_eq!(select_enrollment(&list, Some(b)).unwrap().loyalty_card_id, b);

        let missing = Uuid::new_v4();
        assert_eq!(
            select_enrollment(&list, Some(missing)).unwrap_err(),
            SelectionError::CardNotEnrolled(missing)
        );
    }
}
