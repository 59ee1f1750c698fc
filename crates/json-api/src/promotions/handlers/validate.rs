//! Validate Promotion Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use tracing::error;
use uuid::Uuid;

use beacon_app::domain::promotions::{
    PromotionsServiceError,
    data::EvaluationRequest,
    evaluation::{Evaluation, Pricing, Rejection},
    records::PromotionRecord,
};

use crate::{
    extensions::*,
    money::to_amount,
    observability::record_promotion_evaluation,
    promotions::requests::{DiscountType, ValidatePromotionRequest},
    state::State,
};

const INTERNAL_ERROR_MESSAGE: &str = "Internal server error";
const PACKAGE_NOT_FOUND_MESSAGE: &str = "Package not found";

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromotionSummary {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub package_specific: bool,
}

impl From<PromotionRecord> for PromotionSummary {
    fn from(promotion: PromotionRecord) -> Self {
        PromotionSummary {
            id: promotion.uuid.into(),
            package_specific: promotion.is_package_specific(),
            discount_type: DiscountType::of(&promotion.discount),
            discount_value: to_amount(promotion.discount.value()),
            code: promotion.code,
            name: promotion.name,
            description: promotion.description,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PricingResponse {
    pub original_price: f64,
    pub discount_amount: f64,
    pub final_price: f64,
    pub savings: f64,
}

impl From<Pricing> for PricingResponse {
    fn from(pricing: Pricing) -> Self {
        PricingResponse {
            original_price: to_amount(pricing.original_price),
            discount_amount: to_amount(pricing.discount_amount),
            final_price: to_amount(pricing.final_price),
            savings: to_amount(pricing.savings),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ValidPromotionResponse {
    pub valid: bool,
    pub success: bool,
    pub promotion: PromotionSummary,

    /// Present when the request named a package.
    pub pricing: Option<PricingResponse>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct InvalidPromotionResponse {
    pub valid: bool,
    pub success: bool,
    pub error: String,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum ValidationResponse {
    Valid(ValidPromotionResponse),
    Invalid(InvalidPromotionResponse),
}

impl ValidationResponse {
    fn valid(promotion: PromotionRecord, pricing: Option<Pricing>) -> Self {
        Self::Valid(ValidPromotionResponse {
            valid: true,
            success: true,
            promotion: promotion.into(),
            pricing: pricing.map(Into::into),
        })
    }

    fn invalid(error: impl Into<String>) -> Self {
        Self::Invalid(InvalidPromotionResponse {
            valid: false,
            success: false,
            error: error.into(),
        })
    }
}

const fn rejection_status(rejection: Rejection) -> StatusCode {
    match rejection {
        Rejection::InvalidCode => StatusCode::NOT_FOUND,
        Rejection::PromotionInactive
        | Rejection::PromotionExpired
        | Rejection::UsageLimitExceeded
        | Rejection::PackageMismatch
        | Rejection::UserNotEligible => StatusCode::BAD_REQUEST,
    }
}

/// Validate Promotion Handler
///
/// Checks a promotion code without redeeming it. Rule failures are reported
/// in the body with `valid: false`. The optional `at` query parameter
/// evaluates the code at another point in time.
#[endpoint(
    tags("promotions"),
    summary = "Validate Promotion Code",
    responses(
        (status_code = StatusCode::OK, description = "Promotion applies"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown code or package"),
        (status_code = StatusCode::BAD_REQUEST, description = "Promotion does not apply"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Rate limit exceeded"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<ValidatePromotionRequest>,
    at: QueryParam<String, false>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ValidationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let point_in_time = at.at_or_now()?;
    let request = json.into_inner();

    let request = EvaluationRequest {
        code: request.code,
        package_uuid: request.package_id.map(Into::into),
        user_id: request.user_id,
    };

    let (status, body) = match state
        .app
        .promotions
        .evaluate_promotion(request, point_in_time)
        .await
    {
        Ok(Evaluation::Valid { promotion, pricing }) => {
            record_promotion_evaluation("valid");

            (StatusCode::OK, ValidationResponse::valid(promotion, pricing))
        }
        Ok(Evaluation::Invalid(rejection)) => {
            record_promotion_evaluation(rejection.as_str());

            (
                rejection_status(rejection),
                ValidationResponse::invalid(rejection.to_string()),
            )
        }
        Err(PromotionsServiceError::PackageNotFound) => {
            record_promotion_evaluation("PackageNotFound");

            (
                StatusCode::NOT_FOUND,
                ValidationResponse::invalid(PACKAGE_NOT_FOUND_MESSAGE),
            )
        }
        Err(error) => {
            error!("failed to evaluate promotion: {error:?}");

            (
                StatusCode::INTERNAL_SERVER_ERROR,
                ValidationResponse::invalid(INTERNAL_ERROR_MESSAGE),
            )
        }
    };

    res.status_code(status);

    Ok(Json(body))
}

#[cfg(test)]
mod tests {
    use jiff::Timestamp;
    use salvo::test::{ResponseExt, TestClient};
    use serde_json::{Value, json};
    use testresult::TestResult;

    use beacon_app::domain::{
        packages::records::PackageUuid,
        promotions::{MockPromotionsService, records::PromotionUuid},
    };

    use crate::test_helpers::{StateBuilder, decimal, make_promotion};

    use super::*;

    fn make_service(promotions: MockPromotionsService) -> Service {
        StateBuilder::default()
            .promotions(promotions)
            .service(Router::with_path("promotions/validate").post(handler))
    }

    async fn validate(promotions: MockPromotionsService, body: Value) -> (Option<StatusCode>, Value) {
        let mut res = TestClient::post("http://example.com/promotions/validate")
            .json(&body)
            .send(&make_service(promotions))
            .await;

        let json = res.take_json::<Value>().await.unwrap_or_default();

        (res.status_code, json)
    }

    #[tokio::test]
    async fn test_valid_code_with_package_returns_pricing() -> TestResult {
        let package = PackageUuid::new();
        let promotion = make_promotion(PromotionUuid::new());
        let promotion_id = promotion.uuid.into_uuid();

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_evaluate_promotion()
            .once()
            .withf(move |request, _| {
                request.code == "WELCOME10"
                    && request.package_uuid == Some(package)
                    && request.user_id.as_deref() == Some("user-1")
            })
            .return_once(move |_, _| {
                Ok(Evaluation::Valid {
                    pricing: Some(promotion.discount.apply(decimal("100.00"))),
                    promotion,
                })
            });

        let (status, body) = validate(
            promotions,
            json!({ "code": "WELCOME10", "packageId": package.into_uuid(), "userId": "user-1" }),
        )
        .await;

        assert_eq!(status, Some(StatusCode::OK));
        assert_eq!(
            body,
            json!({
                "valid": true,
                "success": true,
                "promotion": {
                    "id": promotion_id,
                    "code": "WELCOME10",
                    "name": "Welcome",
                    "description": null,
                    "discountType": "PERCENTAGE",
                    "discountValue": 10.0,
                    "packageSpecific": false
                },
                "pricing": {
                    "originalPrice": 100.0,
                    "discountAmount": 10.0,
                    "finalPrice": 90.0,
                    "savings": 10.0
                }
            })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_valid_code_without_package_has_null_pricing() -> TestResult {
        let promotion = make_promotion(PromotionUuid::new());

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_evaluate_promotion()
            .once()
            .withf(|request, _| request.package_uuid.is_none() && request.user_id.is_none())
            .return_once(move |_, _| {
                Ok(Evaluation::Valid {
                    promotion,
                    pricing: None,
                })
            });

        let (status, body) = validate(promotions, json!({ "code": "WELCOME10" })).await;

        assert_eq!(status, Some(StatusCode::OK));
        assert_eq!(body.get("pricing"), Some(&Value::Null));
        assert_eq!(body.get("valid"), Some(&Value::Bool(true)));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_code_returns_404_with_reason() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_evaluate_promotion()
            .once()
            .return_once(|_, _| Ok(Evaluation::Invalid(Rejection::InvalidCode)));

        let (status, body) = validate(promotions, json!({ "code": "NOPE" })).await;

        assert_eq!(status, Some(StatusCode::NOT_FOUND));
        assert_eq!(
            body,
            json!({ "valid": false, "success": false, "error": "Invalid promotion code" })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_rule_failures_return_400_with_reason() -> TestResult {
        let cases = [
            (Rejection::PromotionInactive, "This promotion is not active"),
            (
                Rejection::PromotionExpired,
                "This promotion has expired or has not started yet",
            ),
            (
                Rejection::UsageLimitExceeded,
                "This promotion has reached its usage limit",
            ),
            (
                Rejection::PackageMismatch,
                "This promotion is not valid for the selected package",
            ),
            (
                Rejection::UserNotEligible,
                "You are not eligible for this promotion",
            ),
        ];

        for (rejection, message) in cases {
            let mut promotions = MockPromotionsService::new();

            promotions
                .expect_evaluate_promotion()
                .once()
                .return_once(move |_, _| Ok(Evaluation::Invalid(rejection)));

            let (status, body) = validate(promotions, json!({ "code": "WELCOME10" })).await;

            assert_eq!(status, Some(StatusCode::BAD_REQUEST), "{rejection:?}");
            assert_eq!(
                body.get("error").and_then(Value::as_str),
                Some(message),
                "{rejection:?}"
            );
        }

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_package_returns_404() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_evaluate_promotion()
            .once()
            .return_once(|_, _| Err(PromotionsServiceError::PackageNotFound));

        let (status, body) = validate(
            promotions,
            json!({ "code": "WELCOME10", "packageId": Uuid::now_v7() }),
        )
        .await;

        assert_eq!(status, Some(StatusCode::NOT_FOUND));
        assert_eq!(body.get("valid"), Some(&Value::Bool(false)));

        Ok(())
    }

    #[tokio::test]
    async fn test_storage_failure_returns_generic_500() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_evaluate_promotion()
            .once()
            .return_once(|_, _| Err(PromotionsServiceError::Sql(sqlx::Error::PoolTimedOut)));

        let (status, body) = validate(promotions, json!({ "code": "WELCOME10" })).await;

        assert_eq!(status, Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert_eq!(
            body,
            json!({ "valid": false, "success": false, "error": "Internal server error" })
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_forwards_point_in_time_query_param() -> TestResult {
        let at: Timestamp = "2026-02-21T12:00:00Z".parse()?;
        let promotion = make_promotion(PromotionUuid::new());

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_evaluate_promotion()
            .once()
            .withf(move |_, point_in_time| *point_in_time == at)
            .return_once(move |_, _| {
                Ok(Evaluation::Valid {
                    promotion,
                    pricing: None,
                })
            });

        let res = TestClient::post("http://example.com/promotions/validate?at=2026-02-21T12:00:00Z")
            .json(&json!({ "code": "WELCOME10" }))
            .send(&make_service(promotions))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }

    #[tokio::test]
    async fn test_unparseable_point_in_time_returns_400() -> TestResult {
        let mut promotions = MockPromotionsService::new();

        promotions.expect_evaluate_promotion().never();

        let res = TestClient::post("http://example.com/promotions/validate?at=yesterday")
            .json(&json!({ "code": "WELCOME10" }))
            .send(&make_service(promotions))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::BAD_REQUEST));

        Ok(())
    }
}
