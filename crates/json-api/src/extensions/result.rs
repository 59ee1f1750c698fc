//! Result helper extensions for HTTP handlers.

use std::fmt::Display;

use salvo::prelude::StatusError;
use tracing::{error, warn};

/// Map any error to a logged HTTP error.
pub(crate) trait ResultExt<T> {
    fn or_400(self, brief: &str) -> Result<T, StatusError>;

    fn or_500(self, context: &str) -> Result<T, StatusError>;
}

impl<T, E> ResultExt<T> for Result<T, E>
where
    E: Display,
{
    fn or_400(self, brief: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            warn!("{brief}: {error}");

            StatusError::bad_request().brief(brief)
        })
    }

    fn or_500(self, context: &str) -> Result<T, StatusError> {
        self.map_err(|error| {
            error!("{context}: {error}");

            StatusError::internal_server_error()
        })
    }
}

#[cfg(test)]
mod tests {
    use salvo::http::StatusCode;

    use super::*;

    #[test]
    fn or_400_maps_to_bad_request_with_brief() {
        let result: Result<(), &str> = Err("boom");

        let error = result.or_400("could not parse body").err();

        assert_eq!(error.as_ref().map(|e| e.code), Some(StatusCode::BAD_REQUEST));
        assert_eq!(
            error.map(|e| e.brief),
            Some("could not parse body".to_string())
        );
    }

    #[test]
    fn or_500_hides_error_detail() {
        let result: Result<(), &str> = Err("connection reset");

        let error = result.or_500("failed to load").err();

        assert_eq!(
            error.as_ref().map(|e| e.code),
            Some(StatusCode::INTERNAL_SERVER_ERROR)
        );
        assert!(error.is_some_and(|e| !e.brief.contains("connection reset")));
    }
}
