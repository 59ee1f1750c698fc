//! Package Index Handlers

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use beacon_app::domain::packages::data::PackageVisibility;

use crate::{extensions::*, packages::get::PackageResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PackagesResponse {
    pub packages: Vec<PackageResponse>,
}

async fn list(
    depot: &mut Depot,
    visibility: PackageVisibility,
) -> Result<Json<PackagesResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let packages = state
        .app
        .packages
        .list_packages(visibility)
        .await
        .or_500("failed to fetch packages")?;

    Ok(Json(PackagesResponse {
        packages: packages.into_iter().map(Into::into).collect(),
    }))
}

/// Package Index Handler
///
/// Lists packages currently on sale.
#[endpoint(tags("packages"), summary = "List Packages")]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PackagesResponse>, StatusError> {
    list(depot, PackageVisibility::Active).await
}

/// Package Index Handler (admin)
///
/// Lists every package that has not been deleted, including inactive ones.
#[endpoint(
    tags("packages"),
    summary = "List Packages (admin)",
    security(("bearer_auth" = []))
)]
pub(crate) async fn admin_handler(
    depot: &mut Depot,
) -> Result<Json<PackagesResponse>, StatusError> {
    list(depot, PackageVisibility::All).await
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use beacon_app::domain::packages::{MockPackagesService, records::PackageUuid};

    use crate::test_helpers::{StateBuilder, make_package};

    use super::*;

    fn make_service(packages: MockPackagesService) -> Service {
        StateBuilder::default().packages(packages).service(
            Router::new()
                .push(Router::with_path("packages").get(handler))
                .push(Router::with_path("admin/packages").get(admin_handler)),
        )
    }

    #[tokio::test]
    async fn test_public_index_lists_active_packages() -> TestResult {
        let package = make_package(PackageUuid::new());
        let expected = package.uuid.into_uuid();

        let mut packages = MockPackagesService::new();

        packages
            .expect_list_packages()
            .once()
            .withf(|visibility| *visibility == PackageVisibility::Active)
            .return_once(move |_| Ok(vec![package]));

        let mut res = TestClient::get("http://example.com/packages")
            .send(&make_service(packages))
            .await;

        let body: PackagesResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.packages.iter().map(|p| p.uuid).collect::<Vec<_>>(),
            vec![expected]
        );

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_index_lists_all_packages() -> TestResult {
        let mut packages = MockPackagesService::new();

        packages
            .expect_list_packages()
            .once()
            .withf(|visibility| *visibility == PackageVisibility::All)
            .return_once(|_| Ok(Vec::new()));

        let res = TestClient::get("http://example.com/admin/packages")
            .send(&make_service(packages))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::OK));

        Ok(())
    }
}
