//! Create Package Handler

use std::sync::Arc;

use salvo::{http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use beacon_app::domain::packages::data::NewPackage;

use crate::{
    extensions::*,
    packages::{errors::into_status_error, get::PackageResponse, requests::CreatePackageRequest},
    state::State,
};

/// Create Package Handler
#[endpoint(
    tags("packages"),
    summary = "Create Package",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Package created"),
        (status_code = StatusCode::CONFLICT, description = "Package already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePackageRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PackageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let package = NewPackage::try_from(json.into_inner())?;

    let package = state
        .app
        .packages
        .create_package(package)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/admin/packages/{}", package.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(package.into()))
}
