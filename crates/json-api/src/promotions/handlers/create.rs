//! Create Promotion Handler

use std::sync::Arc;

use salvo::{Depot, http::header::LOCATION, oapi::extract::JsonBody, prelude::*};

use beacon_app::domain::promotions::data::NewPromotion;

use crate::{
    extensions::*,
    promotions::{
        errors::into_status_error, get::PromotionResponse, requests::CreatePromotionRequest,
    },
    state::State,
};

/// Create Promotion Handler
#[endpoint(
    tags("promotions"),
    summary = "Create Promotion",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::CREATED, description = "Promotion created"),
        (status_code = StatusCode::CONFLICT, description = "Promotion code already exists"),
        (status_code = StatusCode::BAD_REQUEST, description = "Bad Request"),
        (status_code = StatusCode::INTERNAL_SERVER_ERROR, description = "Internal Server Error"),
    ),
)]
pub(crate) async fn handler(
    json: JsonBody<CreatePromotionRequest>,
    depot: &mut Depot,
    res: &mut Response,
) -> Result<Json<PromotionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;
    let promotion = NewPromotion::try_from(json.into_inner())?;

    let promotion = state
        .app
        .promotions
        .create_promotion(promotion)
        .await
        .map_err(into_status_error)?;

    res.add_header(LOCATION, format!("/admin/promotions/{}", promotion.uuid), true)
        .or_500("failed to set location header")?
        .status_code(StatusCode::CREATED);

    Ok(Json(promotion.into()))
}
