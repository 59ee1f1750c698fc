//! Promotions service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use tracing::info;

use crate::{
    database::Db,
    domain::promotions::{
        data::{EvaluationRequest, NewPromotion, PromotionDetails, PromotionUpdate},
        errors::PromotionsServiceError,
        evaluation::Evaluation,
        evaluator::PromotionEvaluator,
        records::{PromotionRecord, PromotionUuid},
        repository::PgPromotionsRepository,
    },
};

#[derive(Debug, Clone)]
pub struct PgPromotionsService {
    db: Db,
    repository: PgPromotionsRepository,
    evaluator: PromotionEvaluator,
}

impl PgPromotionsService {
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            db,
            repository: PgPromotionsRepository::new(),
            evaluator: PromotionEvaluator::new(),
        }
    }
}

/// Reject usage limits the `INTEGER` column cannot hold before touching the database.
fn check_usage_limit(details: &PromotionDetails) -> Result<(), PromotionsServiceError> {
    i32::try_from(details.usage_limit)?;

    Ok(())
}

#[async_trait]
impl PromotionsService for PgPromotionsService {
    async fn list_promotions(&self) -> Result<Vec<PromotionRecord>, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let promotions = self.repository.list_promotions(&mut tx).await?;

        tx.commit().await?;

        Ok(promotions)
    }

    async fn get_promotion(
        &self,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let promotion = self.repository.get_promotion(&mut tx, promotion).await?;

        tx.commit().await?;

        Ok(promotion)
    }

    #[tracing::instrument(
        name = "promotions.service.create_promotion",
        skip(self, promotion),
        fields(promotion_uuid = %promotion.uuid, code = %promotion.details.code),
        err
    )]
    async fn create_promotion(
        &self,
        promotion: NewPromotion,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        check_usage_limit(&promotion.details)?;

        let mut tx = self.db.begin_transaction().await?;

        let created = self.repository.create_promotion(&mut tx, promotion).await?;

        tx.commit().await?;

        info!(
            promotion_uuid = %created.uuid,
            discount_type = created.discount.to_str(),
            "created promotion"
        );

        Ok(created)
    }

    #[tracing::instrument(
        name = "promotions.service.update_promotion",
        skip(self, update),
        fields(promotion_uuid = %promotion),
        err
    )]
    async fn update_promotion(
        &self,
        promotion: PromotionUuid,
        update: PromotionUpdate,
    ) -> Result<PromotionRecord, PromotionsServiceError> {
        check_usage_limit(&update.details)?;

        let mut tx = self.db.begin_transaction().await?;

        let updated = self
            .repository
            .update_promotion(&mut tx, promotion, update)
            .await?;

        tx.commit().await?;

        Ok(updated)
    }

    #[tracing::instrument(
        name = "promotions.service.delete_promotion",
        skip(self),
        fields(promotion_uuid = %promotion),
        err
    )]
    async fn delete_promotion(&self, promotion: PromotionUuid) -> Result<(), PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let rows_affected = self.repository.delete_promotion(&mut tx, promotion).await?;

        if rows_affected == 0 {
            return Err(PromotionsServiceError::NotFound);
        }

        tx.commit().await?;

        info!(promotion_uuid = %promotion, "deleted promotion");

        Ok(())
    }

    #[tracing::instrument(
        name = "promotions.service.evaluate_promotion",
        skip(self, request),
        fields(
            code = %request.code,
            package_uuid = ?request.package_uuid,
            valid = tracing::field::Empty
        ),
        err
    )]
    async fn evaluate_promotion(
        &self,
        request: EvaluationRequest,
        at: Timestamp,
    ) -> Result<Evaluation, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let evaluation = self.evaluator.evaluate(&mut tx, &request, at).await?;

        tx.commit().await?;

        tracing::Span::current().record("valid", evaluation.is_valid());

        Ok(evaluation)
    }

    #[tracing::instrument(
        name = "promotions.service.redeem_promotion",
        skip(self, request),
        fields(code = %request.code, package_uuid = ?request.package_uuid),
        err
    )]
    async fn redeem_promotion(
        &self,
        request: EvaluationRequest,
        at: Timestamp,
    ) -> Result<Evaluation, PromotionsServiceError> {
        let mut tx = self.db.begin_transaction().await?;

        let evaluation = self.evaluator.redeem(&mut tx, &request, at).await?;

        tx.commit().await?;

        if let Evaluation::Valid { promotion, .. } = &evaluation {
            info!(
                promotion_uuid = %promotion.uuid,
                times_used = promotion.times_used,
                "redeemed promotion"
            );
        }

        Ok(evaluation)
    }
}

#[automock]
#[async_trait]
pub trait PromotionsService: Send + Sync {
    /// Retrieves all promotions that have not been deleted.
    async fn list_promotions(&self) -> Result<Vec<PromotionRecord>, PromotionsServiceError>;

    /// Retrieve a single promotion.
    async fn get_promotion(
        &self,
        promotion: PromotionUuid,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    async fn create_promotion(
        &self,
        promotion: NewPromotion,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Replaces the admin-editable fields of a promotion.
    async fn update_promotion(
        &self,
        promotion: PromotionUuid,
        update: PromotionUpdate,
    ) -> Result<PromotionRecord, PromotionsServiceError>;

    /// Soft-deletes a promotion, freeing its code for reuse.
    async fn delete_promotion(&self, promotion: PromotionUuid) -> Result<(), PromotionsServiceError>;

    /// Check a promotion code at `at`, pricing it when the request names a package.
    ///
    /// Rule failures are returned as [`Evaluation::Invalid`]; only storage
    /// problems and unknown packages are errors.
    async fn evaluate_promotion(
        &self,
        request: EvaluationRequest,
        at: Timestamp,
    ) -> Result<Evaluation, PromotionsServiceError>;

    /// Evaluate and, if valid, count one use of the promotion.
    async fn redeem_promotion(
        &self,
        request: EvaluationRequest,
        at: Timestamp,
    ) -> Result<Evaluation, PromotionsServiceError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use jiff::SignedDuration;
    use rust_decimal::Decimal;
    use testresult::TestResult;

    use crate::{
        domain::{
            packages::records::PackageUuid,
            promotions::{data::discounts::Discount, evaluation::Rejection},
        },
        test::{TestContext, helpers::promotion_details},
    };

    use super::*;

    fn request(code: &str, package_uuid: Option<PackageUuid>) -> EvaluationRequest {
        EvaluationRequest {
            code: code.to_string(),
            package_uuid,
            user_id: None,
        }
    }

    #[tokio::test]
    async fn create_promotion_returns_record() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let uuid = PromotionUuid::new();

        let created = ctx
            .promotions
            .create_promotion(NewPromotion {
                uuid,
                details: promotion_details("SAVE10", now)?,
            })
            .await?;

        assert_eq!(created.uuid, uuid);
        assert_eq!(created.code, "SAVE10");
        assert_eq!(created.times_used, 0);
        assert_eq!(
            created.discount,
            Discount::Percentage {
                percentage: Decimal::TEN
            }
        );

        let fetched = ctx.promotions.get_promotion(uuid).await?;

        assert_eq!(fetched, created);

        Ok(())
    }

    #[tokio::test]
    async fn create_promotion_duplicate_code_ignoring_case_returns_already_exists() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.create_promotion(promotion_details("WINTER", now)?).await?;

        let result = ctx
            .create_promotion(promotion_details("winter", now)?)
            .await;

        assert!(
            matches!(result, Err(PromotionsServiceError::AlreadyExists)),
            "expected AlreadyExists, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_promotion_window_ending_before_start_returns_invalid_data() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        let mut details = promotion_details("BACKWARDS", now)?;
        details.ends_at = details.starts_at.checked_sub(SignedDuration::from_secs(1))?;

        let result = ctx.create_promotion(details).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_promotion_percentage_over_hundred_returns_invalid_data() -> TestResult {
        let ctx = TestContext::new().await;

        let mut details = promotion_details("TOOMUCH", Timestamp::now())?;
        details.discount = Discount::Percentage {
            percentage: Decimal::new(101, 0),
        };

        let result = ctx.create_promotion(details).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::InvalidData)),
            "expected InvalidData, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_promotion_unknown_package_returns_invalid_reference() -> TestResult {
        let ctx = TestContext::new().await;

        let mut details = promotion_details("ORPHAN", Timestamp::now())?;
        details.package_uuid = Some(PackageUuid::new());

        let result = ctx.create_promotion(details).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::InvalidReference)),
            "expected InvalidReference, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn create_promotion_oversized_usage_limit_returns_invalid_usage_limit() -> TestResult {
        let ctx = TestContext::new().await;

        let mut details = promotion_details("HUGE", Timestamp::now())?;
        details.usage_limit = u32::MAX;

        let result = ctx.create_promotion(details).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::InvalidUsageLimit(_))),
            "expected InvalidUsageLimit, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn update_promotion_keeps_usage_counter() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let promotion = ctx.create_promotion(promotion_details("SAVE10", now)?).await?;

        ctx.promotions
            .redeem_promotion(request("SAVE10", None), now)
            .await?;

        let mut details = promotion_details("SAVE15", now)?;
        details.discount = Discount::Percentage {
            percentage: Decimal::new(15, 0),
        };

        let updated = ctx
            .promotions
            .update_promotion(promotion.uuid, PromotionUpdate { details })
            .await?;

        assert_eq!(updated.code, "SAVE15");
        assert_eq!(updated.times_used, 1);

        Ok(())
    }

    #[tokio::test]
    async fn deleted_promotion_code_is_invalid_and_reusable() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let promotion = ctx.create_promotion(promotion_details("GONE", now)?).await?;

        ctx.promotions.delete_promotion(promotion.uuid).await?;

        let evaluation = ctx
            .promotions
            .evaluate_promotion(request("GONE", None), now)
            .await?;

        assert_eq!(evaluation.rejection(), Some(Rejection::InvalidCode));

        let listed = ctx.promotions.list_promotions().await?;

        assert!(!listed.iter().any(|p| p.uuid == promotion.uuid));

        ctx.create_promotion(promotion_details("GONE", now)?).await?;

        Ok(())
    }

    #[tokio::test]
    async fn delete_promotion_unknown_uuid_returns_not_found() {
        let ctx = TestContext::new().await;

        let result = ctx.promotions.delete_promotion(PromotionUuid::new()).await;

        assert!(
            matches!(result, Err(PromotionsServiceError::NotFound)),
            "expected NotFound, got {result:?}"
        );
    }

    #[tokio::test]
    async fn evaluate_promotion_prices_package() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let provider = ctx.create_provider("Openserve").await?;
        let package = ctx.create_package(provider, Decimal::ONE_HUNDRED).await?;

        ctx.create_promotion(promotion_details("SAVE10", now)?).await?;

        let evaluation = ctx
            .promotions
            .evaluate_promotion(request("SAVE10", Some(package)), now)
            .await?;

        let Evaluation::Valid {
            pricing: Some(pricing),
            ..
        } = evaluation
        else {
            return Err(format!("expected priced evaluation, got {evaluation:?}").into());
        };

        assert_eq!(pricing.final_price, Decimal::new(9000, 2));
        assert_eq!(pricing.discount_amount, Decimal::new(1000, 2));
        assert_eq!(pricing.savings, Decimal::new(1000, 2));

        Ok(())
    }

    #[tokio::test]
    async fn evaluate_promotion_without_package_has_no_pricing() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.create_promotion(promotion_details("SAVE10", now)?).await?;

        let evaluation = ctx
            .promotions
            .evaluate_promotion(request("SAVE10", None), now)
            .await?;

        assert!(matches!(evaluation, Evaluation::Valid { pricing: None, .. }));

        Ok(())
    }

    #[tokio::test]
    async fn evaluate_promotion_code_is_case_sensitive() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.create_promotion(promotion_details("SAVE10", now)?).await?;

        let evaluation = ctx
            .promotions
            .evaluate_promotion(request("save10", None), now)
            .await?;

        assert_eq!(evaluation.rejection(), Some(Rejection::InvalidCode));

        Ok(())
    }

    #[tokio::test]
    async fn evaluate_promotion_after_end_is_expired() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let promotion = ctx.create_promotion(promotion_details("SAVE10", now)?).await?;

        let later = promotion.ends_at.checked_add(SignedDuration::from_secs(1))?;

        let evaluation = ctx
            .promotions
            .evaluate_promotion(request("SAVE10", None), later)
            .await?;

        assert_eq!(evaluation.rejection(), Some(Rejection::PromotionExpired));

        Ok(())
    }

    #[tokio::test]
    async fn evaluate_promotion_unknown_package_returns_package_not_found() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        ctx.create_promotion(promotion_details("SAVE10", now)?).await?;

        let result = ctx
            .promotions
            .evaluate_promotion(request("SAVE10", Some(PackageUuid::new())), now)
            .await;

        assert!(
            matches!(result, Err(PromotionsServiceError::PackageNotFound)),
            "expected PackageNotFound, got {result:?}"
        );

        Ok(())
    }

    #[tokio::test]
    async fn evaluate_promotion_does_not_count_usage() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();
        let promotion = ctx.create_promotion(promotion_details("SAVE10", now)?).await?;

        for _ in 0..3 {
            ctx.promotions
                .evaluate_promotion(request("SAVE10", None), now)
                .await?;
        }

        let fetched = ctx.promotions.get_promotion(promotion.uuid).await?;

        assert_eq!(fetched.times_used, 0);

        Ok(())
    }

    #[tokio::test]
    async fn redeem_promotion_stops_at_usage_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        let mut details = promotion_details("ONCE", now)?;
        details.usage_limit = 1;
        ctx.create_promotion(details).await?;

        let first = ctx
            .promotions
            .redeem_promotion(request("ONCE", None), now)
            .await?;

        assert!(first.is_valid(), "expected first redemption to succeed");

        let second = ctx
            .promotions
            .redeem_promotion(request("ONCE", None), now)
            .await?;

        assert_eq!(second.rejection(), Some(Rejection::UsageLimitExceeded));

        Ok(())
    }

    #[tokio::test]
    async fn concurrent_redemptions_never_exceed_usage_limit() -> TestResult {
        let ctx = TestContext::new().await;
        let now = Timestamp::now();

        let mut details = promotion_details("RUSH", now)?;
        details.usage_limit = 3;
        let promotion = ctx.create_promotion(details).await?;

        let service = Arc::new(PgPromotionsService::new(Db::new(ctx.db.pool().clone())));

        let handles: Vec<_> = (0..10)
            .map(|_| {
                let service = Arc::clone(&service);

                tokio::spawn(async move {
                    service.redeem_promotion(request("RUSH", None), now).await
                })
            })
            .collect();

        let mut redeemed = 0;

        for handle in handles {
            if handle.await??.is_valid() {
                redeemed += 1;
            }
        }

        let fetched = ctx.promotions.get_promotion(promotion.uuid).await?;

        assert_eq!(redeemed, 3);
        assert_eq!(fetched.times_used, 3);

        Ok(())
    }
}
