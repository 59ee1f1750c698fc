//! Storage-backed promotion evaluation and redemption.

use jiff::Timestamp;
use sqlx::{Postgres, Transaction};
use tracing::debug;

use crate::domain::{
    packages::repository::PgPackagesRepository,
    promotions::{
        PromotionsServiceError,
        data::EvaluationRequest,
        evaluation::{Evaluation, Rejection, check_eligibility},
        repository::PgPromotionsRepository,
    },
};

/// Looks up the promotion and package for a request and runs the evaluation
/// rules against them, within the caller's transaction.
#[derive(Debug, Clone, Default)]
pub(crate) struct PromotionEvaluator {
    promotions: PgPromotionsRepository,
    packages: PgPackagesRepository,
}

impl PromotionEvaluator {
    #[must_use]
    pub(crate) fn new() -> Self {
        Self {
            promotions: PgPromotionsRepository::new(),
            packages: PgPackagesRepository::new(),
        }
    }

    /// Evaluate `request` at `at` without side effects.
    pub(crate) async fn evaluate(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &EvaluationRequest,
        at: Timestamp,
    ) -> Result<Evaluation, PromotionsServiceError> {
        let promotion = self
            .promotions
            .find_promotion_by_code(tx, &request.code)
            .await?;

        if let Err(rejection) = check_eligibility(promotion.as_ref(), request, at) {
            debug!(code = %request.code, reason = rejection.as_str(), "promotion rejected");

            return Ok(Evaluation::Invalid(rejection));
        }

        let Some(promotion) = promotion else {
            return Ok(Evaluation::Invalid(Rejection::InvalidCode));
        };

        let base_price = match request.package_uuid {
            Some(package_uuid) => Some(
                self.packages
                    .find_package(tx, package_uuid)
                    .await?
                    .ok_or(PromotionsServiceError::PackageNotFound)?
                    .current_price,
            ),
            None => None,
        };

        Ok(Evaluation::priced(promotion, base_price))
    }

    /// Evaluate `request` and, when valid, count one redemption.
    ///
    /// The usage counter is bumped with a conditional update, so concurrent
    /// redemptions can never push it past the limit.
    pub(crate) async fn redeem(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        request: &EvaluationRequest,
        at: Timestamp,
    ) -> Result<Evaluation, PromotionsServiceError> {
        let (promotion, pricing) = match self.evaluate(tx, request, at).await? {
            Evaluation::Valid { promotion, pricing } => (promotion, pricing),
            invalid @ Evaluation::Invalid(_) => return Ok(invalid),
        };

        match self.promotions.redeem_promotion(tx, promotion.uuid).await? {
            Some(promotion) => Ok(Evaluation::Valid { promotion, pricing }),
            None => Ok(Evaluation::Invalid(Rejection::UsageLimitExceeded)),
        }
    }
}
