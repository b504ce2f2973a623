//! 请求和响应的数据传输对象

pub mod request;
pub mod response;

pub use request::{
    CampaignQuery, CreateCampaignRequest, CreateCustomerRequest, CreateLoyaltyCardRequest,
    CustomerQuery, EnrollRequest, GenerateCampaignRequest, GrantStampsRequest, LoyaltyCardQuery,
    PaginationParams, UpdateBusinessRequest, UpdateCampaignRequest, UpdateCustomerRequest,
    UpdateLoyaltyCardRequest,
};
pub use response::{ApiResponse, PageResponse};
