//! Promotion evaluation.
//!
//! Applicability checks run in a fixed order and stop at the first failing
//! rule. Nothing here touches storage: callers look up the promotion and the
//! package price and pass in the point in time to evaluate at.

use jiff::Timestamp;
use rust_decimal::Decimal;
use thiserror::Error;

pub use crate::domain::promotions::data::discounts::Pricing;
use crate::domain::promotions::{data::EvaluationRequest, records::PromotionRecord};

/// Why a promotion cannot be used.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum Rejection {
    #[error("Invalid promotion code")]
    InvalidCode,

    #[error("This promotion is not active")]
    PromotionInactive,

    #[error("This promotion has expired or has not started yet")]
    PromotionExpired,

    #[error("This promotion has reached its usage limit")]
    UsageLimitExceeded,

    #[error("This promotion is not valid for the selected package")]
    PackageMismatch,

    #[error("You are not eligible for this promotion")]
    UserNotEligible,
}

impl Rejection {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::InvalidCode => "InvalidCode",
            Self::PromotionInactive => "PromotionInactive",
            Self::PromotionExpired => "PromotionExpired",
            Self::UsageLimitExceeded => "UsageLimitExceeded",
            Self::PackageMismatch => "PackageMismatch",
            Self::UserNotEligible => "UserNotEligible",
        }
    }
}

/// Result of evaluating a promotion code.
#[derive(Debug, Clone, PartialEq)]
pub enum Evaluation {
    /// The promotion applies. `pricing` is present only when a package was given.
    Valid {
        promotion: PromotionRecord,
        pricing: Option<Pricing>,
    },

    Invalid(Rejection),
}

impl Evaluation {
    /// Accept `promotion`, pricing it against `base_price` when one is known.
    #[must_use]
    pub fn priced(promotion: PromotionRecord, base_price: Option<Decimal>) -> Self {
        let pricing = base_price.map(|price| promotion.discount.apply(price));

        Self::Valid { promotion, pricing }
    }

    #[must_use]
    pub const fn is_valid(&self) -> bool {
        matches!(self, Self::Valid { .. })
    }

    #[must_use]
    pub const fn rejection(&self) -> Option<Rejection> {
        match self {
            Self::Valid { .. } => None,
            Self::Invalid(rejection) => Some(*rejection),
        }
    }
}

/// Check whether `promotion` may be used for `request` at `at`.
///
/// `None` stands for a code that matched no promotion. A package or user
/// restriction is only checked when the request names a package or user.
///
/// # Errors
///
/// Returns the first [`Rejection`] that applies.
pub fn check_eligibility(
    promotion: Option<&PromotionRecord>,
    request: &EvaluationRequest,
    at: Timestamp,
) -> Result<(), Rejection> {
    let Some(promotion) = promotion else {
        return Err(Rejection::InvalidCode);
    };

    if !promotion.active {
        return Err(Rejection::PromotionInactive);
    }

    if !promotion.is_running_at(at) {
        return Err(Rejection::PromotionExpired);
    }

    if promotion.is_exhausted() {
        return Err(Rejection::UsageLimitExceeded);
    }

    if let (Some(required), Some(requested)) = (promotion.package_uuid, request.package_uuid)
        && required != requested
    {
        return Err(Rejection::PackageMismatch);
    }

    if let Some(user_id) = request.user_id.as_deref()
        && !promotion.eligible_users.is_empty()
        && !promotion.eligible_users.iter().any(|eligible| eligible == user_id)
    {
        return Err(Rejection::UserNotEligible);
    }

    Ok(())
}
