//! Update Promotion Handler

use std::sync::Arc;

use salvo::{
    Depot,
    oapi::extract::{JsonBody, PathParam},
    prelude::*,
};
use uuid::Uuid;

use beacon_app::domain::promotions::data::PromotionUpdate;

use crate::{
    extensions::*,
    promotions::{errors::into_status_error, get::PromotionResponse, requests::PromotionRequest},
    state::State,
};

/// Update Promotion Handler
///
/// Replaces every editable field. The redemption count is kept.
#[endpoint(
    tags("promotions"),
    summary = "Update Promotion",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promotion updated"),
        (status_code = StatusCode::NOT_FOUND, description = "Promotion not found"),
        (status_code = StatusCode::CONFLICT, description = "Promotion code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    json: JsonBody<PromotionRequest>,
    depot: &mut Depot,
) -> Result<Json<PromotionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let update = PromotionUpdate::try_from(json.into_inner())?;

    let promotion = state
        .app
        .promotions
        .update_promotion(uuid.into_inner().into(), update)
        .await
        .map_err(into_status_error)?;

    Ok(Json(promotion.into()))
}
