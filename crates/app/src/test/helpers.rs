//! Test Helpers

use jiff::{SignedDuration, Timestamp};
use rust_decimal::Decimal;

use crate::domain::promotions::data::{PromotionDetails, discounts::Discount};

/// A running, unrestricted 10% promotion valid from a day before `now`
/// until thirty days after.
pub(crate) fn promotion_details(
    code: &str,
    now: Timestamp,
) -> Result<PromotionDetails, jiff::Error> {
    Ok(PromotionDetails {
        code: code.to_string(),
        name: format!("{code} promotion"),
        description: None,
        discount: Discount::Percentage {
            percentage: Decimal::TEN,
        },
        starts_at: now.checked_sub(SignedDuration::from_hours(24))?,
        ends_at: now.checked_add(SignedDuration::from_hours(30 * 24))?,
        usage_limit: 0,
        package_uuid: None,
        eligible_users: Vec::new(),
        active: true,
        stackable: false,
        auto_apply: false,
    })
}
