//! Get Provider Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::providers::records::ProviderRecord;

use crate::{extensions::*, providers::errors::into_status_error, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ProviderResponse {
    pub uuid: Uuid,
    pub name: String,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl From<ProviderRecord> for ProviderResponse {
    fn from(provider: ProviderRecord) -> Self {
        ProviderResponse {
            uuid: provider.uuid.into(),
            name: provider.name,
            created_at: provider.created_at.to_string(),
            updated_at: provider.updated_at.to_string(),
            deleted_at: provider.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Get Provider Handler
#[endpoint(
    tags("providers"),
    summary = "Get Provider",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Provider"),
        (status_code = StatusCode::NOT_FOUND, description = "Provider not found"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<ProviderResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let provider = state
        .app
        .providers
        .get_provider(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(provider.into()))
}
