//! 集点状态迁移
//!
//! 给定当前进度、集满所需点数和本次发放点数，计算新的点数、状态和兑换次数。
//! 调用方负责在同一事务内把三个字段写回。
//!
//! ## 规则
//!
//! 1. 是否已集满按更新前的点数判断
//! 2. 新点数 = min(当前 + 发放, 所需)，超出部分直接丢弃，不结转
//! 3. 由未集满变为集满时状态置为 completed，兑换次数 +1（每轮只计一次）
//! 4. 未达到所需点数时状态为 active
//! 5. 更新前已集满时兑换次数不变，状态统一为 completed
//!    （所需点数被调低后，原先 active 的卡在下一次集点时补记为 completed）

use serde::{Deserialize, Serialize};

use crate::models::EnrollmentStatus;

/// 顾客卡片的集点进度（参与计算的三个字段）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentProgress {
    pub current_stamps: i32,
    pub status: EnrollmentStatus,
    pub total_redeemed: i32,
}

impl EnrollmentProgress {
    /// 新加入的卡片：0 点、集点中、未兑换
    pub fn fresh() -> Self {
        Self {
            current_stamps: 0,
            status: EnrollmentStatus::Active,
            total_redeemed: 0,
        }
    }
}

/// 已校验的发放点数
///
/// 只能通过 `new` 构造，保证为正且不超过单次上限
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StampIncrement(i32);

impl StampIncrement {
    pub fn new(value: i64, max_increment: i32) -> Result<Self, String> {
        if value <= 0 {
            return Err(format!("集点数必须为正整数，当前为 {}", value));
        }
        if value > i64::from(max_increment) {
            return Err(format!(
                "单次集点数不能超过 {}，当前为 {}",
                max_increment, value
            ));
        }
        // max_increment 为 i32，上面已保证不溢出
        Ok(Self(value as i32))
    }

    pub fn get(self) -> i32 {
        self.0
    }
}

/// 一次集点的计算结果
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccrualOutcome {
    pub new_stamp_count: i32,
    pub new_status: EnrollmentStatus,
    pub new_total_redeemed: i32,
    /// 本次是否触发集满
    pub completed_now: bool,
    /// 实际计入的点数
    pub stamps_applied: i32,
}

impl AccrualOutcome {
    pub fn progress(&self) -> EnrollmentProgress {
        EnrollmentProgress {
            current_stamps: self.new_stamp_count,
            status: self.new_status,
            total_redeemed: self.new_total_redeemed,
        }
    }
}

/// 计算集点后的进度
///
/// 纯函数，对合法输入（required_stamps > 0，increment 已校验）总是成功。
pub fn apply_stamps(
    progress: &EnrollmentProgress,
    required_stamps: i32,
    increment: StampIncrement,
) -> AccrualOutcome {
    debug_assert!(required_stamps > 0, "stamps_required must be positive");

    let current = progress.current_stamps;
    let was_completed = current >= required_stamps;

    let new_stamp_count = current.saturating_add(increment.get()).min(required_stamps);
    let now_completed = new_stamp_count >= required_stamps;

    let (new_status, new_total_redeemed, completed_now) = if !was_completed && now_completed {
        (
            EnrollmentStatus::Completed,
            progress.total_redeemed.saturating_add(1),
            true,
        )
    } else if new_stamp_count < required_stamps {
        (EnrollmentStatus::Active, progress.total_redeemed, false)
    } else {
        (EnrollmentStatus::Completed, progress.total_redeemed, false)
    };

    AccrualOutcome {
        new_stamp_count,
        new_status,
        new_total_redeemed,
        completed_now,
        stamps_applied: (new_stamp_count - current).max(0),
    }
}
