//! Conversion between stored decimal amounts and JSON numbers.

use rust_decimal::{Decimal, RoundingStrategy, prelude::*};
use salvo::prelude::StatusError;

const DECIMAL_PLACES: u32 = 2;

/// Render an amount as a JSON number with at most two decimal places.
pub(crate) fn to_amount(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Parse a JSON number into an amount, rejecting values that are not finite.
pub(crate) fn from_amount(value: f64, field: &str) -> Result<Decimal, StatusError> {
    if !value.is_finite() {
        return Err(StatusError::bad_request().brief(format!("{field} must be a finite number")));
    }

    Decimal::from_f64(value)
        .map(|amount| {
            amount.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        })
        .ok_or_else(|| StatusError::bad_request().brief(format!("{field} is out of range")))
}
