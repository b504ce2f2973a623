//! 集点卡后台端到端测试
//!
//! 需要运行中的 carimbo-admin 服务及其数据库，默认忽略：
//! `ADMIN_SERVICE_URL=http://127.0.0.1:8080 cargo test --test e2e -- --ignored`
//!
//! 测试覆盖：
//! - 登录与鉴权
//! - 集点卡、顾客、加入卡片
//! - 集点发放、集满与歧义
//! - 错误码与 HTTP 状态

pub mod api_client;
pub mod stamp_api;

pub use api_client::{ApiClient, TestMerchant};
