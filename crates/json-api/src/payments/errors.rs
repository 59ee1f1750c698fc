//! Payment Errors

use salvo::http::StatusError;
use tracing::error;

use beacon_app::domain::payments::PaymentsServiceError;

pub(crate) fn into_status_error(error: PaymentsServiceError) -> StatusError {
    match error {
        PaymentsServiceError::NotFound => StatusError::not_found().brief("Payment not found"),
        PaymentsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Payment already exists")
        }
        PaymentsServiceError::PackageNotFound => {
            StatusError::not_found().brief("Package not found")
        }
        PaymentsServiceError::PackageUnavailable => {
            StatusError::bad_request().brief("Package is not available for purchase")
        }
        PaymentsServiceError::PromotionRejected(rejection) => {
            StatusError::bad_request().brief(rejection.to_string())
        }
        PaymentsServiceError::InvalidSignature => {
            StatusError::bad_request().brief("Invalid notification signature")
        }
        PaymentsServiceError::AmountMismatch => {
            StatusError::bad_request().brief("Notification amount does not match payment")
        }
        PaymentsServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid payment payload")
        }
        PaymentsServiceError::Promotion(source) => {
            error!("failed to redeem promotion: {source:?}");

            StatusError::internal_server_error()
        }
        PaymentsServiceError::Sql(source) => {
            error!("failed to process payment: {source}");

            StatusError::internal_server_error()
        }
    }
}
