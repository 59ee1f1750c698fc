//! Promotions Requests

use salvo::{oapi::ToSchema, prelude::StatusError};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::promotions::{
    data::{NewPromotion, PromotionDetails, PromotionUpdate, discounts::Discount},
    records::PromotionUuid,
};

use crate::{extensions::*, money::from_amount};

/// Discount kinds as they appear on the wire.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub(crate) enum DiscountType {
    Percentage,
    FixedAmount,
    OverridePrice,
}

impl DiscountType {
    pub(crate) const fn of(discount: &Discount) -> Self {
        match discount {
            Discount::Percentage { .. } => Self::Percentage,
            Discount::FixedAmount { .. } => Self::FixedAmount,
            Discount::OverridePrice { .. } => Self::OverridePrice,
        }
    }
}

const fn default_active() -> bool {
    true
}

/// Promotion fields an admin can set.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromotionRequest {
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,

    /// RFC 3339 start of the validity window
    pub start_date: String,

    /// RFC 3339 end of the validity window
    pub end_date: String,

    /// Maximum redemptions, `0` for unlimited
    #[serde(default)]
    pub usage_limit: u32,

    /// Restrict the promotion to one package
    pub package_id: Option<Uuid>,

    /// Restrict the promotion to these user identifiers
    #[serde(default)]
    pub user_specific: Vec<String>,

    #[serde(default = "default_active")]
    pub active: bool,

    #[serde(default)]
    pub stackable: bool,

    #[serde(default)]
    pub auto_apply: bool,
}

/// Create Promotion Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq)]
pub(crate) struct CreatePromotionRequest {
    /// Client-chosen identifier; generated when omitted.
    pub uuid: Option<Uuid>,

    #[serde(flatten)]
    pub promotion: PromotionRequest,
}

impl TryFrom<PromotionRequest> for PromotionDetails {
    type Error = StatusError;

    fn try_from(request: PromotionRequest) -> Result<Self, Self::Error> {
        let value = from_amount(request.discount_value, "discountValue")?;

        let discount = match request.discount_type {
            DiscountType::Percentage => Discount::Percentage { percentage: value },
            DiscountType::FixedAmount => Discount::FixedAmount { amount: value },
            DiscountType::OverridePrice => Discount::OverridePrice { price: value },
        };

        Ok(PromotionDetails {
            code: request.code,
            name: request.name,
            description: request.description,
            discount,
            starts_at: parse_timestamp(&request.start_date, "startDate", DayBound::Start)?,
            ends_at: parse_timestamp(&request.end_date, "endDate", DayBound::End)?,
            usage_limit: request.usage_limit,
            package_uuid: request.package_id.map(Into::into),
            eligible_users: request.user_specific,
            active: request.active,
            stackable: request.stackable,
            auto_apply: request.auto_apply,
        })
    }
}

impl TryFrom<CreatePromotionRequest> for NewPromotion {
    type Error = StatusError;

    fn try_from(request: CreatePromotionRequest) -> Result<Self, Self::Error> {
        Ok(NewPromotion {
            uuid: request.uuid.map_or_else(PromotionUuid::new, Into::into),
            details: request.promotion.try_into()?,
        })
    }
}

impl TryFrom<PromotionRequest> for PromotionUpdate {
    type Error = StatusError;

    fn try_from(request: PromotionRequest) -> Result<Self, Self::Error> {
        Ok(PromotionUpdate {
            details: request.try_into()?,
        })
    }
}

/// Validate Promotion Request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ValidatePromotionRequest {
    pub code: String,
    pub package_id: Option<Uuid>,
    pub user_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use salvo::http::StatusCode;
    use testresult::TestResult;

    use super::*;

    const CREATE_JSON: &str = r#"
        {
            "uuid": "019c8e08-0000-7000-8000-000000000001",
            "code": "FIBRE20",
            "name": "Fibre launch",
            "discountType": "PERCENTAGE",
            "discountValue": 20,
            "startDate": "2026-01-01T00:00:00Z",
            "endDate": "2026-03-31T23:59:59Z",
            "usageLimit": 100,
            "userSpecific": ["user-1"]
        }
    "#;

    #[test]
    fn create_promotion_request_parse() -> TestResult {
        let request: CreatePromotionRequest = serde_json::from_str(CREATE_JSON)?;
        let promotion = NewPromotion::try_from(request)?;

        assert_eq!(
            promotion.uuid.into_uuid(),
            "019c8e08-0000-7000-8000-000000000001".parse::<Uuid>()?
        );
        assert_eq!(
            promotion.details.discount,
            Discount::Percentage {
                percentage: Decimal::from(20)
            }
        );
        assert_eq!(promotion.details.starts_at, "2026-01-01T00:00:00Z".parse()?);
        assert_eq!(promotion.details.usage_limit, 100);
        assert_eq!(promotion.details.eligible_users, vec!["user-1".to_string()]);
        assert_eq!(promotion.details.package_uuid, None);
        assert!(promotion.details.active, "promotions default to active");
        assert!(!promotion.details.stackable, "stackable defaults to false");

        Ok(())
    }

    #[test]
    fn unparseable_dates_are_bad_requests() -> TestResult {
        let mut request: CreatePromotionRequest = serde_json::from_str(CREATE_JSON)?;

        request.promotion.end_date = "next tuesday".to_string();

        let error = NewPromotion::try_from(request).err();

        assert_eq!(error.map(|e| e.code), Some(StatusCode::BAD_REQUEST));

        Ok(())
    }

    #[test]
    fn bare_end_date_runs_to_the_end_of_that_day() -> TestResult {
        let mut request: CreatePromotionRequest = serde_json::from_str(CREATE_JSON)?;

        request.promotion.end_date = "2026-03-31".to_string();

        let promotion = NewPromotion::try_from(request)?;

        assert_eq!(
            promotion.details.ends_at,
            "2026-03-31T23:59:59.999999999Z".parse()?
        );

        Ok(())
    }

    #[test]
    fn discount_types_use_screaming_snake_case() -> TestResult {
        assert_eq!(
            serde_json::to_string(&DiscountType::OverridePrice)?,
            "\"OVERRIDE_PRICE\""
        );
        assert_eq!(
            serde_json::from_str::<DiscountType>("\"FIXED_AMOUNT\"")?,
            DiscountType::FixedAmount
        );

        Ok(())
    }
}
