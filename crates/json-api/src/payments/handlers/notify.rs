//! Payment Notification Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::payments::ozow::OzowNotification;

use crate::{extensions::*, payments::errors::into_status_error, state::State};

/// Notification body as Ozow posts it, form encoded or JSON.
#[derive(Debug, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub(crate) struct NotificationRequest {
    pub site_code: String,
    pub transaction_id: String,
    pub transaction_reference: String,
    pub amount: String,
    pub status: String,
    pub optional1: Option<String>,
    pub optional2: Option<String>,
    pub optional3: Option<String>,
    pub optional4: Option<String>,
    pub optional5: Option<String>,
    pub currency_code: String,
    pub is_test: String,
    pub status_message: Option<String>,
    pub hash: String,
}

impl From<NotificationRequest> for OzowNotification {
    fn from(request: NotificationRequest) -> Self {
        OzowNotification {
            site_code: request.site_code,
            transaction_id: request.transaction_id,
            transaction_reference: request.transaction_reference,
            amount: request.amount,
            status: request.status,
            optional1: request.optional1,
            optional2: request.optional2,
            optional3: request.optional3,
            optional4: request.optional4,
            optional5: request.optional5,
            currency_code: request.currency_code,
            is_test: request.is_test,
            status_message: request.status_message,
            hash: request.hash,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct NotificationResponse {
    pub payment_id: Uuid,
    pub status: String,
}

/// Payment Notification Handler
///
/// Receives Ozow's server-to-server status notification.
#[endpoint(
    tags("payments"),
    summary = "Ozow Payment Notification",
    responses(
        (status_code = StatusCode::OK, description = "Notification recorded"),
        (status_code = StatusCode::BAD_REQUEST, description = "Invalid signature or body"),
        (status_code = StatusCode::NOT_FOUND, description = "Unknown transaction reference"),
    ),
)]
pub(crate) async fn handler(
    req: &mut Request,
    depot: &mut Depot,
) -> Result<Json<NotificationResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let notification = req
        .parse_body::<NotificationRequest>()
        .await
        .or_400("invalid notification body")?;

    let payment = state
        .app
        .payments
        .record_notification(notification.into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(NotificationResponse {
        payment_id: payment.uuid.into(),
        status: payment.status.to_string(),
    }))
}
