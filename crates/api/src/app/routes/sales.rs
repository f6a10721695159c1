use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Extension},
    http::StatusCode,
    routing::post,
    Json, Router,
};

use stocksense_sales::Sale;

use crate::app::dto;
use crate::app::routes::common::ApiResult;
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new().route("/", post(record_sales))
}

pub async fn record_sales(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::RecordSalesRequest>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Vec<Sale>>)> {
    let Json(body) = body?;
    let sales = services.inventory.record_sales(body.sales).await?;
    Ok((StatusCode::CREATED, Json(sales)))
}
