//! Promotion Errors

use salvo::http::StatusError;
use tracing::error;

use beacon_app::domain::promotions::PromotionsServiceError;

pub(crate) fn into_status_error(error: PromotionsServiceError) -> StatusError {
    match error {
        PromotionsServiceError::AlreadyExists => {
            StatusError::conflict().brief("Promotion code already exists")
        }
        PromotionsServiceError::InvalidReference => {
            StatusError::bad_request().brief("Package not found")
        }
        PromotionsServiceError::MissingRequiredData
        | PromotionsServiceError::InvalidData
        | PromotionsServiceError::InvalidUsageLimit(_) => {
            StatusError::bad_request().brief("Invalid promotion payload")
        }
        PromotionsServiceError::NotFound => StatusError::not_found().brief("Promotion not found"),
        PromotionsServiceError::PackageNotFound => {
            StatusError::not_found().brief("Package not found")
        }
        PromotionsServiceError::Sql(source) => {
            error!("failed to process promotion: {source}");

            StatusError::internal_server_error()
        }
    }
}
