//! Delete Package Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, packages::errors::into_status_error, state::State};

/// Delete Package Handler
#[endpoint(
    tags("packages"),
    summary = "Delete Package",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Package deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Package not found"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .packages
        .delete_package(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use salvo::test::TestClient;
    use testresult::TestResult;

    use beacon_app::domain::packages::{
        MockPackagesService, PackagesServiceError, records::PackageUuid,
    };

    use crate::test_helpers::StateBuilder;

    use super::*;

    fn make_service(packages: MockPackagesService) -> Service {
        StateBuilder::default()
            .packages(packages)
            .admin_service(Router::with_path("admin/packages/{uuid}").delete(handler))
    }

    #[tokio::test]
    async fn test_delete_package_success() -> TestResult {
        let uuid = PackageUuid::new();

        let mut packages = MockPackagesService::new();

        packages
            .expect_delete_package()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(|_| Ok(()));

        let res = TestClient::delete(format!("http://example.com/admin/packages/{uuid}"))
            .send(&make_service(packages))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NO_CONTENT));

        Ok(())
    }

    #[tokio::test]
    async fn test_delete_missing_package_returns_404() -> TestResult {
        let uuid = PackageUuid::new();

        let mut packages = MockPackagesService::new();

        packages
            .expect_delete_package()
            .once()
            .return_once(|_| Err(PackagesServiceError::NotFound));

        let res = TestClient::delete(format!("http://example.com/admin/packages/{uuid}"))
            .send(&make_service(packages))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
