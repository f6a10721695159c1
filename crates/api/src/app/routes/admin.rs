use std::sync::Arc;

use axum::{
    extract::Extension,
    routing::{delete, post},
    Json, Router,
};

use stocksense_infra::SeedSummary;

use crate::app::dto;
use crate::app::routes::common::ApiResult;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/seed-sales", post(seed_sales))
        .route("/clear-sales", delete(clear_sales))
}

pub async fn seed_sales(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<SeedSummary>> {
    Ok(Json(services.inventory.seed_demo_sales().await?))
}

pub async fn clear_sales(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<dto::ClearSalesResponse>> {
    let deleted = services.inventory.clear_sales().await?;
    Ok(Json(dto::ClearSalesResponse::new(deleted)))
}
