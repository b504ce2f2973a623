//! 集点计算
//!
//! 纯函数，不涉及 I/O：
//! - `engine`：集点状态迁移（封顶、集满判定、兑换计数）
//! - `selection`：未指定卡片时的选卡策略
//! - `limits`：每日上限与有效期

pub mod engine;
pub mod limits;
pub mod selection;

pub use engine::{AccrualOutcome, EnrollmentProgress, StampIncrement, apply_stamps};
pub use limits::{DailyLimitExceeded, check_daily_limit, enrollment_expires_at};
pub use selection::{SelectionError, select_enrollment};
