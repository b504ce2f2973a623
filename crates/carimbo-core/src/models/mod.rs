//! 集点卡系统领域模型

pub mod business;
pub mod campaign;
pub mod customer;
pub mod enrollment;
pub mod enums;
pub mod loyalty_card;
pub mod merchant;
pub mod stamp;

// 重新导出常用类型
pub use business::{Business, BusinessChanges, BusinessSettings};
pub use campaign::{Campaign, CampaignChanges, NewCampaign};
pub use customer::{Customer, CustomerChanges, NewCustomer, normalize_phone};
pub use enrollment::{Enrollment, EnrollmentView};
pub use enums::{
    CampaignChannel, CampaignStatus, CampaignTone, CardStatus, ContentSource, EnrollmentStatus,
    MerchantUserStatus,
};
pub use loyalty_card::{
    CardDesign, LoyaltyCard, LoyaltyCardChanges, LoyaltyCardRules, NewLoyaltyCard,
};
pub use merchant::MerchantUser;
pub use stamp::StampTransaction;
