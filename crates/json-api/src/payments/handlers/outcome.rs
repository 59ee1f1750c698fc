//! Payment Redirect Handler

use salvo::{
    oapi::{
        ToSchema,
        extract::{PathParam, QueryParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentOutcomeResponse {
    /// `success`, `cancel` or `error`
    pub outcome: String,

    pub transaction_reference: Option<String>,
    pub status: Option<String>,
}

/// Payment Redirect Handler
///
/// Landing page for the customer's browser after the gateway. The payment
/// itself is only updated by the signed notification.
#[endpoint(
    tags("payments"),
    summary = "Payment Redirect",
    responses(
        (status_code = StatusCode::OK, description = "Redirect received"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown outcome"),
    ),
)]
pub(crate) async fn handler(
    outcome: PathParam<String>,
    #[salvo(parameter(rename = "TransactionReference"))] transaction_reference: QueryParam<
        String,
        false,
    >,
    #[salvo(parameter(rename = "Status"))] status: QueryParam<String, false>,
) -> Result<Json<PaymentOutcomeResponse>, StatusError> {
    let outcome = outcome.into_inner();

    if !matches!(outcome.as_str(), "success" | "cancel" | "error") {
        return Err(StatusError::not_found());
    }

    Ok(Json(PaymentOutcomeResponse {
        outcome,
        transaction_reference: transaction_reference.into_inner(),
        status: status.into_inner(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use super::*;

    fn make_service() -> Service {
        Service::new(Router::with_path("payments/{outcome}").get(handler))
    }

    #[tokio::test]
    async fn test_success_redirect_echoes_reference() -> TestResult {
        let mut res = TestClient::get(
            "http://example.com/payments/success?TransactionReference=BCN-REF&Status=Complete",
        )
        .send(&make_service())
        .await;

        let body: PaymentOutcomeResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.outcome, "success");
        assert_eq!(body.transaction_reference.as_deref(), Some("BCN-REF"));

        Ok(())
    }

    #[tokio::test]
    async fn test_unknown_outcome_returns_404() -> TestResult {
        let res = TestClient::get("http://example.com/payments/refunded")
            .send(&make_service())
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
