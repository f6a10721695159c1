use std::sync::Arc;

use axum::{extract::Extension, routing::get, Json, Router};

use stocksense_analytics::RefillRecommendation;

use crate::app::routes::common::ApiResult;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", get(refill_decisions))
}

pub async fn refill_decisions(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<RefillRecommendation>>> {
    Ok(Json(services.inventory.refill_decisions().await?))
}
