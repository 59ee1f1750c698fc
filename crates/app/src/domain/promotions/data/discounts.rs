//! Promotion Discounts

use rust_decimal::{Decimal, RoundingStrategy};

/// Discount applied by a promotion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Discount {
    /// Take a percentage (0-100) off the base price.
    Percentage { percentage: Decimal },

    /// Subtract a fixed amount, never going below zero.
    FixedAmount { amount: Decimal },

    /// Replace the base price outright.
    OverridePrice { price: Decimal },
}

/// Outcome of applying a [`Discount`] to a base price, rounded to cents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pricing {
    pub original_price: Decimal,
    pub discount_amount: Decimal,
    pub final_price: Decimal,
    pub savings: Decimal,
}

impl Discount {
    #[must_use]
    pub const fn to_str(&self) -> &'static str {
        match self {
            Self::Percentage { .. } => "percentage",
            Self::FixedAmount { .. } => "fixed_amount",
            Self::OverridePrice { .. } => "override_price",
        }
    }

    #[must_use]
    pub const fn value(&self) -> Decimal {
        match self {
            Self::Percentage { percentage } => *percentage,
            Self::FixedAmount { amount } => *amount,
            Self::OverridePrice { price } => *price,
        }
    }

    /// Rebuild a discount from its stored kind and value.
    #[must_use]
    pub fn from_parts(kind: &str, value: Decimal) -> Option<Self> {
        match kind {
            "percentage" => Some(Self::Percentage { percentage: value }),
            "fixed_amount" => Some(Self::FixedAmount { amount: value }),
            "override_price" => Some(Self::OverridePrice { price: value }),
            _ => None,
        }
    }

    /// Price `base_price` under this discount.
    ///
    /// An override above the base price yields a negative discount, which is
    /// reported unchanged.
    #[must_use]
    pub fn apply(&self, base_price: Decimal) -> Pricing {
        let (discount_amount, final_price) = match *self {
            Self::Percentage { percentage } => {
                let discount_amount = to_cents(base_price * percentage / Decimal::ONE_HUNDRED);

                (discount_amount, base_price - discount_amount)
            }
            Self::FixedAmount { amount } => (amount, (base_price - amount).max(Decimal::ZERO)),
            Self::OverridePrice { price } => (base_price - price, price),
        };

        let discount_amount = to_cents(discount_amount);

        Pricing {
            original_price: to_cents(base_price),
            discount_amount,
            final_price: to_cents(final_price),
            savings: discount_amount,
        }
    }
}

fn to_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn dec(value: &str) -> Result<Decimal, rust_decimal::Error> {
        value.parse()
    }

    #[test]
    fn percentage_takes_share_of_base_price() -> TestResult {
        let pricing = Discount::Percentage {
            percentage: dec("10")?,
        }
        .apply(dec("100")?);

        assert_eq!(pricing.discount_amount, dec("10.00")?);
        assert_eq!(pricing.final_price, dec("90.00")?);
        assert_eq!(pricing.savings, pricing.discount_amount);

        Ok(())
    }

    #[test]
    fn percentage_rounds_to_cents_half_away_from_zero() -> TestResult {
        let pricing = Discount::Percentage {
            percentage: dec("12.5")?,
        }
        .apply(dec("0.20")?);

        // 12.5% of 0.20 is 0.025
        assert_eq!(pricing.discount_amount, dec("0.03")?);
        assert_eq!(pricing.final_price, dec("0.17")?);

        Ok(())
    }

    #[test]
    fn percentage_keeps_discount_and_final_price_summing_to_base() -> TestResult {
        let base = dec("99.99")?;
        let pricing = Discount::Percentage {
            percentage: dec("33.33")?,
        }
        .apply(base);

        assert_eq!(pricing.discount_amount, dec("33.33")?);
        assert_eq!(pricing.final_price, dec("66.66")?);
        assert_eq!(pricing.discount_amount + pricing.final_price, base);

        Ok(())
    }

    #[test]
    fn fixed_amount_never_goes_below_zero() -> TestResult {
        let pricing = Discount::FixedAmount {
            amount: dec("100")?,
        }
        .apply(dec("50")?);

        assert_eq!(pricing.final_price, Decimal::ZERO);
        assert_eq!(pricing.discount_amount, dec("100.00")?);

        Ok(())
    }

    #[test]
    fn fixed_amount_subtracts_from_base() -> TestResult {
        let pricing = Discount::FixedAmount {
            amount: dec("150.50")?,
        }
        .apply(dec("699.00")?);

        assert_eq!(pricing.final_price, dec("548.50")?);
        assert_eq!(pricing.original_price, dec("699.00")?);

        Ok(())
    }

    #[test]
    fn override_price_sets_final_price_exactly() -> TestResult {
        let pricing = Discount::OverridePrice {
            price: dec("199.00")?,
        }
        .apply(dec("499.00")?);

        assert_eq!(pricing.final_price, dec("199.00")?);
        assert_eq!(pricing.discount_amount, dec("300.00")?);

        Ok(())
    }

    #[test]
    fn override_price_above_base_reports_negative_discount() -> TestResult {
        let pricing = Discount::OverridePrice {
            price: dec("120")?,
        }
        .apply(dec("100")?);

        assert_eq!(pricing.final_price, dec("120")?);
        assert_eq!(pricing.discount_amount, dec("-20")?);
        assert_eq!(pricing.savings, dec("-20")?);

        Ok(())
    }

    #[test]
    fn from_parts_round_trips_stored_kind() -> TestResult {
        let discount = Discount::FixedAmount {
            amount: dec("25")?,
        };

        assert_eq!(
            Discount::from_parts(discount.to_str(), discount.value()),
            Some(discount)
        );
        assert_eq!(Discount::from_parts("bogof", Decimal::ONE), None);

        Ok(())
    }
}
