//! Get Package Handlers

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::packages::records::PackageRecord;

use crate::{extensions::*, money::to_amount, packages::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PackageResponse {
    pub uuid: Uuid,
    pub provider_uuid: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub download_mbps: u32,
    pub upload_mbps: u32,

    /// Un-discounted monthly price
    pub current_price: f64,

    pub active: bool,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl From<PackageRecord> for PackageResponse {
    fn from(package: PackageRecord) -> Self {
        PackageResponse {
            uuid: package.uuid.into(),
            provider_uuid: package.provider_uuid.into(),
            name: package.name,
            description: package.description,
            download_mbps: package.download_mbps,
            upload_mbps: package.upload_mbps,
            current_price: to_amount(package.current_price),
            active: package.active,
            created_at: package.created_at.to_string(),
            updated_at: package.updated_at.to_string(),
            deleted_at: package.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Get Package Handler
///
/// Returns a package that is on sale. Inactive packages are reported as missing.
#[endpoint(
    tags("packages"),
    summary = "Get Package",
    responses(
        (status_code = StatusCode::OK, description = "Package"),
        (status_code = StatusCode::NOT_FOUND, description = "Package not found"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PackageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let package = state
        .app
        .packages
        .get_package(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    if !package.active {
        return Err(StatusError::not_found().brief("Package not found"));
    }

    Ok(Json(package.into()))
}

/// Get Package Handler (admin)
///
/// Returns a package regardless of whether it is on sale.
#[endpoint(
    tags("packages"),
    summary = "Get Package (admin)",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Package"),
        (status_code = StatusCode::NOT_FOUND, description = "Package not found"),
    ),
)]
pub(crate) async fn admin_handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PackageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let package = state
        .app
        .packages
        .get_package(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(package.into()))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use beacon_app::domain::packages::{
        MockPackagesService, PackagesServiceError, records::PackageUuid,
    };

    use crate::test_helpers::{StateBuilder, make_package};

    use super::*;

    fn make_service(packages: MockPackagesService) -> Service {
        StateBuilder::default().packages(packages).service(
            Router::new()
                .push(Router::with_path("packages/{uuid}").get(handler))
                .push(Router::with_path("admin/packages/{uuid}").get(admin_handler)),
        )
    }

    #[tokio::test]
    async fn test_get_active_package_returns_200() -> TestResult {
        let uuid = PackageUuid::new();
        let package = make_package(uuid);

        let mut packages = MockPackagesService::new();

        packages
            .expect_get_package()
            .once()
            .withf(move |u| *u == uuid)
            .return_once(move |_| Ok(package));

        let mut res = TestClient::get(format!("http://example.com/packages/{uuid}"))
            .send(&make_service(packages))
            .await;

        let body: PackageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(body.uuid, uuid.into_uuid());
        assert!((body.current_price - 599.0).abs() < f64::EPSILON);

        Ok(())
    }

    #[tokio::test]
    async fn test_get_inactive_package_returns_404_publicly() -> TestResult {
        let uuid = PackageUuid::new();
        let package = PackageRecord {
            active: false,
            ..make_package(uuid)
        };

        let mut packages = MockPackagesService::new();

        packages
            .expect_get_package()
            .once()
            .return_once(move |_| Ok(package));

        let res = TestClient::get(format!("http://example.com/packages/{uuid}"))
            .send(&make_service(packages))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }

    #[tokio::test]
    async fn test_admin_get_inactive_package_returns_200() -> TestResult {
        let uuid = PackageUuid::new();
        let package = PackageRecord {
            active: false,
            ..make_package(uuid)
        };

        let mut packages = MockPackagesService::new();

        packages
            .expect_get_package()
            .once()
            .return_once(move |_| Ok(package));

        let mut res = TestClient::get(format!("http://example.com/admin/packages/{uuid}"))
            .send(&make_service(packages))
            .await;

        let body: PackageResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert!(!body.active, "inactive package should be returned as is");

        Ok(())
    }

    #[tokio::test]
    async fn test_get_missing_package_returns_404() -> TestResult {
        let uuid = PackageUuid::new();

        let mut packages = MockPackagesService::new();

        packages
            .expect_get_package()
            .once()
            .return_once(|_| Err(PackagesServiceError::NotFound));

        let res = TestClient::get(format!("http://example.com/packages/{uuid}"))
            .send(&make_service(packages))
            .await;

        assert_eq!(res.status_code, Some(StatusCode::NOT_FOUND));

        Ok(())
    }
}
