//! 集点卡商家后台服务
//!
//! 为餐厅商家提供顾客、集点卡、集点发放、营销活动和电子卡券的 REST API。
//!
//! ## 模块结构
//!
//! - `auth`: JWT 与密码处理
//! - `dto`: 请求和响应的数据传输对象
//! - `error`: 错误类型与 HTTP 映射
//! - `handlers`: HTTP 请求处理器
//! - `middleware`: 认证中间件
//! - `routes`: 路由配置
//! - `state`: 应用状态
//!
//! ## 技术栈
//!
//! - Web 框架：Axum
//! - 数据验证：validator
//! - 序列化：serde (camelCase)

pub mod auth;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use dto::{ApiResponse, PageResponse, PaginationParams};
pub use error::{AdminError, Result};
pub use state::AppState;
