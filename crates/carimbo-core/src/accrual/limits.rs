//! 每日上限与有效期

use chrono::{DateTime, TimeDelta, Utc};

use super::engine::StampIncrement;

/// 超出每日上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DailyLimitExceeded {
    pub limit: i32,
    pub granted_today: i64,
}

/// 检查每日集点上限
///
/// granted_today 为当地自然日内已实际计入的点数。未设置上限时总是通过。
pub fn check_daily_limit(
    max_stamps_per_day: Option<i32>,
    granted_today: i64,
    increment: StampIncrement,
) -> Result<(), DailyLimitExceeded> {
    match max_stamps_per_day {
        Some(limit) if granted_today + i64::from(increment.get()) > i64::from(limit) => {
            Err(DailyLimitExceeded {
                limit,
                granted_today,
            })
        }
        _ => Ok(()),
    }
}

/// 卡片过期时间：加入时间 + 有效天数
///
/// 超出可表示的时间范围时视为永久有效
pub fn enrollment_expires_at(
    created_at: DateTime<Utc>,
    expiry_days: Option<i32>,
) -> Option<DateTime<Utc>> {
    let days = TimeDelta::try_days(i64::from(expiry_days?))?;
    created_at.checked_add_signed(days)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn inc(n: i64) -> StampIncrement {
        StampIncrement::new(n, 100).unwrap()
    }

    #[test]
    fn test_no_limit() {
        assert!(check_daily_limit(None, 1_000, inc(50)).is_ok());
    }

    #[test]
    fn test_limit_boundary() {
        assert!(check_daily_limit(Some(3), 2, inc(1)).is_ok());
        assert!(check_daily_limit(Some(3), 0, inc(3)).is_ok());

        let err = check_daily_limit(Some(3), 2, inc(2)).unwrap_err();
        assert_eq!(err.limit, 3);
        assert_eq!(err.granted_today, 2);
    }

    #[test]
    fn test_expires_at() {
        let created = Utc::now();
        assert_eq!(enrollment_expires_at(created, None), None);
        assert_eq!(
            enrollment_expires_at(created, Some(7)),
            Some(created + TimeDelta::days(7))
        );
    }

    #[test]
    fn test_huge_expiry_never_expires() {
        let created = Utc::now();
        assert_eq!(enrollment_expires_at(created, Some(i32::MAX)), None);
        assert!(enrollment_expires_at(DateTime::<Utc>::MAX_UTC, Some(1)).is_none());
    }
}
