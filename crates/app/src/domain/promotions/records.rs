//! Promotions Records

use jiff::Timestamp;

use crate::{
    domain::{packages::records::PackageUuid, promotions::data::discounts::Discount},
    uuids::TypedUuid,
};

/// Promotion UUID
pub type PromotionUuid = TypedUuid<PromotionRecord>;

/// Promotion Record
#[derive(Debug, Clone, PartialEq)]
pub struct PromotionRecord {
    pub uuid: PromotionUuid,

    /// Redeemable code, matched exactly on lookup.
    pub code: String,

    pub name: String,
    pub description: Option<String>,
    pub discount: Discount,
    pub starts_at: Timestamp,
    pub ends_at: Timestamp,

    /// Maximum successful redemptions; `0` is unlimited.
    pub usage_limit: u32,

    pub times_used: u32,

    /// Restricts the promotion to a single package when set.
    pub package_uuid: Option<PackageUuid>,

    /// Restricts the promotion to these user identifiers when non-empty.
    pub eligible_users: Vec<String>,

    pub active: bool,
    pub stackable: bool,
    pub auto_apply: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    pub deleted_at: Option<Timestamp>,
}

impl PromotionRecord {
    #[must_use]
    pub const fn is_package_specific(&self) -> bool {
        self.package_uuid.is_some()
    }

    #[must_use]
    pub const fn is_unlimited(&self) -> bool {
        self.usage_limit == 0
    }

    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        !self.is_unlimited() && self.times_used >= self.usage_limit
    }

    /// Whether `at` falls inside the inclusive validity window.
    #[must_use]
    pub fn is_running_at(&self, at: Timestamp) -> bool {
        self.starts_at <= at && at <= self.ends_at
    }
}
