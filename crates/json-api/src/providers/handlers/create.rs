//! Create Provider Handler

use std::sync::Arc;

use salvo::{
    http::header::LOCATION,
    oapi::{ToSchema, extract::JsonBody},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::providers::{data::NewProvider, records::ProviderUuid};

use crate::{
    extensions::*,
    providers::{errors::into_status_error, get::ProviderResponse},
    state::State,
};

/// Create Provider Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct CreateProviderRequest {
    /// Client-chosen identifier; generated when omitted.
    pub uuid: Option<Uuid>,
    pub name: String,
}

impl From<CreateProviderRequest> for NewProvider {
    fn from(request: CreateProviderRequest) -> Self {
        NewProvider {
            uuid: request.uuid.map_or_else(ProviderUuid::new, Into::into),
            name: request.name,
        }
    }
}

/// Create Provider Handler
#[endpoint(
    tags("providers"),
    summary = "Create Provider",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Provider created"),
        (status_code = StatusCode::CONFLICT, description = "Provider already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreateProviderRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<ProviderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let provider = state
        .app
        .providers
        .create_provider(json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/admin/providers/{}", provider.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(provider.into()))
}
