//! Get Promotion Handler

use std::{string::ToString, sync::Arc};

use salvo::{
    oapi::{ToSchema, extract::PathParam},
    prelude::*,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use beacon_app::domain::promotions::records::PromotionRecord;

use crate::{
    extensions::*,
    money::to_amount,
    promotions::{errors::into_status_error, requests::DiscountType},
    state::State,
};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PromotionResponse {
    pub uuid: Uuid,
    pub code: String,
    pub name: String,
    pub description: Option<String>,
    pub discount_type: DiscountType,
    pub discount_value: f64,
    pub start_date: String,
    pub end_date: String,
    pub usage_limit: u32,
    pub times_used: u32,
    pub package_id: Option<Uuid>,
    pub user_specific: Vec<String>,
    pub active: bool,
    pub stackable: bool,
    pub auto_apply: bool,
    pub created_at: String,
    pub updated_at: String,
    pub deleted_at: Option<String>,
}

impl From<PromotionRecord> for PromotionResponse {
    fn from(promotion: PromotionRecord) -> Self {
        PromotionResponse {
            uuid: promotion.uuid.into(),
            code: promotion.code,
            name: promotion.name,
            description: promotion.description,
            discount_type: DiscountType::of(&promotion.discount),
            discount_value: to_amount(promotion.discount.value()),
            start_date: promotion.starts_at.to_string(),
            end_date: promotion.ends_at.to_string(),
            usage_limit: promotion.usage_limit,
            times_used: promotion.times_used,
            package_id: promotion.package_uuid.map(Into::into),
            user_specific: promotion.eligible_users,
            active: promotion.active,
            stackable: promotion.stackable,
            auto_apply: promotion.auto_apply,
            created_at: promotion.created_at.to_string(),
            updated_at: promotion.updated_at.to_string(),
            deleted_at: promotion.deleted_at.as_ref().map(ToString::to_string),
        }
    }
}

/// Get Promotion Handler
#[endpoint(
    tags("promotions"),
    summary = "Get Promotion",
    security(("bearer_auth" = [])),
    responses(
        (status_code = StatusCode::OK, description = "Promotion"),
        (status_code = StatusCode::NOT_FOUND, description = "Promotion not found"),
    ),
)]
pub(crate) async fn handler(
    uuid: PathParam<Uuid>,
    depot: &mut Depot,
) -> Result<Json<PromotionResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promotion = state
        .app
        .promotions
        .get_promotion(uuid.into_inner().into())
        .await
        .map_err(into_status_error)?;

    Ok(Json(promotion.into()))
}
