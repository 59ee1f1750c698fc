//! Update Provider Handler

use std::sync::Arc;

use salvo::{
    oapi::{
        ToSchema,
        extract::{JsonBody, PathParam},
    },
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::providers::data::ProviderUpdate;

use crate::{
    extensions::*,
    providers::{errors::into_status_error, get::ProviderResponse},
    state::State,
};

/// Update Provider Request
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct UpdateProviderRequest {
    pub name: String,
}

impl From<UpdateProviderRequest> for ProviderUpdate {
    fn from(request: UpdateProviderRequest) -> Self {
        ProviderUpdate { name: request.name }
    }
}

/// Update Provider Handler
#[endpoint(
    tags("providers"),
    summary = "Update Provider",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Provider updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Provider not found"),
        (status_code = StatusCode::CONFLICT, description = "Provider name already taken"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<UpdateProviderRequest>,
    depot: &mut Depot,
) -> Result<Json<ProviderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let provider = state
        .app
        .providers
        .update_provider(uuid.into_inner().into(), json.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(provider.into()))
}
