//! Promotions Data

use jiff::Timestamp;

use crate::domain::{
    packages::records::PackageUuid,
    promotions::{data::discounts::Discount, records::PromotionUuid},
};

pub mod discounts;

/// New Promotion Data
#[derive(Debug, Clone, PartialEq)]
pub struct NewPromotion {
    pub uuid: PromotionUuid,
    pub details: PromotionDetails,
}

/// Promotion Update Data
///
/// Replaces every admin-editable field. The redemption counter is untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionUpdate {
    pub details: PromotionDetails,
}

/// Admin-editable promotion fields.
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionDetails {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount: Discount,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,
    pub usage_limit: u32,
    pub package_uuid: Option<PackageUuid>,
    pub eligible_users: Vec<String>,
    pub active: bool,
    pub stackable: bool,
    pub auto_apply: bool,
}

/// A request to check a promotion code, optionally against a package and user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EvaluationRequest {
    pub code: String,
    pub package_uuid: Option<PackageUuid>,
    pub user_id: Option<String>,
}
