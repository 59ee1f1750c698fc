//! Update Package Handler

use std::sync::Arc;

use salvo::{
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use beacon_app::domain::packages::data::PackageUpdate;

use crate::{
    extensions::*,
    packages::{errors::into_status_error, get::PackageResponse, requests::PackageRequest},
    state::State,
};

/// Update Package Handler
///
/// Replaces every editable field of the package.
#[endpoint(
    tags("packages"),
    summary = "Update Package",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Package updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Package not found"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<PackageRequest>,
    depot: &mut Depot,
) -> Result<Json<PackageResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let update = PackageUpdate::try_from(json.into_inner())?;

    let package = state
        .app
        .packages
        .update_package(uuid.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(package.into()))
}
