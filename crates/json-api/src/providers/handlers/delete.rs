//! Delete Provider Handler

use std::sync::Arc;

use salvo::{oapi::extract::PathParam, prelude::*};
use uuid::Uuid;

use crate::{extensions::*, providers::errors::into_status_error, state::State};

/// Delete Provider Handler
///
/// Providers that still have packages cannot be deleted.
#[endpoint(
    tags("providers"),
    summary = "Delete Provider",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::NO_CONTENT, description = "Provider deleted"),
        (status_code = StatusCode::NOT_FOUND, description = "Provider not found"),
        (status_code = StatusCode::CONFLICT, description = "Provider still has packages"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<StatusCode, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    state
        .app
        .providers
        .delete_provider(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(StatusCode::NO_CONTENT)
}
