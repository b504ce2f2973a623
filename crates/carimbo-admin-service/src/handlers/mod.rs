//! HTTP 请求处理器模块
//!
//! 业务接口都从 `Extension<Claims>` 取 business_id，请求体中的 ID 只在该租户内解析

pub mod auth;
pub mod business;
pub mod campaign;
pub mod customer;
pub mod enrollment;
pub mod loyalty_card;
pub mod stamp;
pub mod wallet_pass;
