//! Promotion Index Handler

use std::sync::Arc;

use salvo::{oapi::ToSchema, prelude::*};
use serde::{Deserialize, Serialize};

use crate::{extensions::*, promotions::get::PromotionResponse, state::State};

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub(crate) struct PromotionsResponse {
    pub promotions: Vec<PromotionResponse>,
}

/// Promotion Index Handler
#[endpoint(tags("promotions"), summary = "List Promotions", security(("bearer_auth" = [])))]
pub(crate) async fn handler(depot: &mut Depot) -> Result<Json<PromotionsResponse>, StatusError> {
    let state = depot.obtain_or_500::<Arc<State>>()?;

    let promotions = state
        .app
        .promotions
        .list_promotions()
        .await
        .or_500("failed to fetch promotions")?;

    Ok(Json(PromotionsResponse {
        promotions: promotions.into_iter().map(Into::into).collect(),
    }))
}

#[cfg(test)]
mod tests {
    use salvo::test::{ResponseExt, TestClient};
    use testresult::TestResult;

    use beacon_app::domain::promotions::{MockPromotionsService, records::PromotionUuid};

    use crate::test_helpers::{StateBuilder, make_promotion};

    use super::*;

    #[tokio::test]
    async fn test_index_lists_promotions() -> TestResult {
        let promotion = make_promotion(PromotionUuid::new());
        let expected = promotion.uuid.into_uuid();

        let mut promotions = MockPromotionsService::new();

        promotions
            .expect_list_promotions()
            .once()
            .return_once(move || Ok(vec![promotion]));

        let service = StateBuilder::default()
            .promotions(promotions)
            .admin_service(Router::with_path("admin/promotions").get(handler));

        let mut res = TestClient::get("http://example.com/admin/promotions")
            .send(&service)
            .await;

        let body: PromotionsResponse = res.take_json().await?;

        assert_eq!(res.status_code, Some(StatusCode::OK));
        assert_eq!(
            body.promotions.iter().map(|p| p.uuid).collect::<Vec<_>>(),
            vec![expected]
        );

        Ok(())
    }
}
