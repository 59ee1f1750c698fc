//! Package Errors

use salvo::http::StatusError;
use tracing::error;

use beacon_app::domain::packages::PackagesServiceError;

pub(crate) fn into_status_error(error: PackagesServiceError) -> StatusError {
    match error {
        PackagesServiceError::AlreadyExists => {
            StatusError::conflict().brief("Package already exists")
        }
        PackagesServiceError::InvalidReference => {
            StatusError::bad_request().brief("Provider not found")
        }
        PackagesServiceError::MissingRequiredData
        | PackagesServiceError::InvalidData
        | PackagesServiceError::InvalidSpeed(_) => {
            StatusError::bad_request().brief("Invalid package payload")
        }
        PackagesServiceError::NotFound => StatusError::not_found().brief("Package not found"),
        PackagesServiceError::Sql(source) => {
            error!("failed to process package: {source}");

            StatusError::internal_server_error()
        }
    }
}
