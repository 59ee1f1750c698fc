//! Provider Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, providers::get::ProviderResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct ProvidersResponse {
    pub providers: Vec<ProviderResponse>,
}

/// Provider Index Handler
#[endpoint(tags("providers"), summary = "List Providers", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<ProvidersResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let providers = state
        .app
        .providers
        .list_providers()
        .await
        .or_500("failed to fetch providers")?;

    Ok(Json(ProvidersResponse {
        providers: providers.into_iter().map(Into::into).collect(),
    }))
}
