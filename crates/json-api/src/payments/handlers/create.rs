//! Create Payment Handler

use std::sync::Arc;

use jiff::Timestamp;
use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::payments::{
    PaymentsServiceError,
    data::{NewPayment, PaymentInitiation},
    records::PaymentUuid,
};

use crate::{
    extensions::*,
    money::to_amount,
    payments::errors::into_status_error,
    promotions::validate::{InvalidPromotionResponse, PricingResponse},
    state::State,
};

/// Create Payment Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct CreatePaymentRequest {
    pub package_id: Uuid,
    pub promotion_code: Option<String>,
    pub user_id: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OzowFormField {
    pub name: String,
    pub value: String,
}

/// Form the customer's browser posts to the gateway.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct OzowFormPost {
    pub url: String,

    /// Fields in gateway order, ending with `HashCheck`.
    pub fields: Vec<OzowFormField>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PaymentInitiatedResponse {
    pub payment_id: Uuid,
    pub transaction_reference: String,
    pub amount: f64,
    pub status: String,

    /// Present when a promotion code was redeemed.
    pub pricing: Option<PricingResponse>,

    pub ozow: OzowFormPost,
}

impl From<PaymentInitiation> for PaymentInitiatedResponse {
    fn from(initiation: PaymentInitiation) -> Self {
        let fields = initiation
            .ozow
            .form_fields()
            .into_iter()
            .map(|(name, value)| OzowFormField {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect();

        PaymentInitiatedResponse {
            payment_id: initiation.payment.uuid.into(),
            transaction_reference: initiation.payment.transaction_reference,
            amount: to_amount(initiation.payment.amount),
            status: initiation.payment.status.to_string(),
            pricing: initiation.pricing.map(Into::into),
            ozow: OzowFormPost {
                url: initiation.ozow.post_url,
                fields,
            },
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(untagged)]
pub(crate) enum PaymentResponse {
    Initiated(PaymentInitiatedResponse),
    PromotionRejected(InvalidPromotionResponse),
}

/// Create Payment Handler
///
/// Starts a payment for an active package, redeeming the promotion code when
/// one is given. A rejected code is reported with `valid: false`.
#[endpoint(
    tags("payments"),
    summary = "Initiate Payment",
    responses(
        (status_code = StatusCode::CREATED, description = "Payment initiated"),
        (status_code = StatusCode::BAD_REQUEST, description = "Promotion rejected or package unavailable"),
        (status_code = StatusCode::NOT_FOUND, description = "Package not found"),
        (status_code = StatusCode::TOO_MANY_REQUESTS, description = "Rate limit exceeded"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePaymentRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PaymentResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let request = json.into_inner();

    let payment = NewPayment {
        uuid: PaymentUuid::new(),
        package_uuid: request.package_id.into(),
        promotion_code: request.promotion_code,
        user_id: request.user_id,
    };

    let initiation = match state
        .app
        .payments
        .initiate_payment(payment, Timestamp::now())
        .await
    {
        Ok(initiation) => initiation,
        Err(PaymentsServiceError::PromotionRejected(rejection)) => {
            res.status_code(StatusCode::BAD_REQUEST);

            return Ok(Json(PaymentResponse::PromotionRejected(
                InvalidPromotionResponse {
                    valid: false,
                    success: false,
                    error: rejection.to_string(),
                },
            )));
        }
        Err(error) => return Err(into_status_error(error)),
    };

    res.add_header(
        LOCATION,
        format!("/payments/{}", initiation.payment.uuid),
        true,
    )
    .or_500("failed to set location header")?
    .status_code(StatusCode::CREATED);

    Ok(Json(PaymentResponse::Initiated(initiation.into())))
}
