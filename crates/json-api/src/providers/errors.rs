//! Provider Errors

use salvo::http::StatusError;
use tracing::error;

use beacon_app::domain::providers::ProvidersServiceError;

pub(crate) fn into_status_error(error: ProvidersServiceError) -> StatusError {
    match error {
        ProvidersServiceError::AlreadyExists => {
            StatusError::conflict().brief("Provider already exists")
        }
        ProvidersServiceError::InUse => {
            StatusError::conflict().brief("Provider still has packages")
        }
        ProvidersServiceError::MissingRequiredData | ProvidersServiceError::InvalidData => {
            StatusError::bad_request().brief("Invalid provider payload")
        }
        ProvidersServiceError::NotFound => StatusError::not_found().brief("Provider not found"),
        ProvidersServiceError::Sql(source) => {
            error!("failed to process provider: {source}");

            StatusError::internal_server_error()
        }
    }
}
