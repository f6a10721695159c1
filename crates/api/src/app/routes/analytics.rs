use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    routing::{delete, get, post},
    Json, Router,
};

use stocksense_analytics::dead_stock::DEFAULT_LOOKBACK_DAYS;
use stocksense_analytics::{
    DailyProductTrend, DailyTotal, DamageReport, DeadStockReport, FinancialReport,
    StockoutReport, WeeklyTrend,
};
use stocksense_infra::WriteOff;
use stocksense_products::Product;

use crate::app::dto;
use crate::app::routes::common::{parse_product_id, ApiResult};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/trends", get(weekly_trends))
        .route("/daily-trends", get(daily_trends))
        .route("/daily-totals", get(daily_totals))
        .route("/financial", get(financial))
        .route("/stockout", get(stockout))
        .route("/damaged", get(damaged))
        .route("/dead-stock", get(dead_stock))
        .route("/mark-damaged", post(mark_damaged))
        .route("/write-off-damaged/:product_id", delete(write_off_damaged))
}

pub async fn weekly_trends(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<WeeklyTrend>>> {
    Ok(Json(services.inventory.weekly_trends().await?))
}

pub async fn daily_trends(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<DailyProductTrend>>> {
    Ok(Json(services.inventory.daily_trends().await?))
}

pub async fn daily_totals(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<Vec<DailyTotal>>> {
    Ok(Json(services.inventory.daily_totals().await?))
}

pub async fn financial(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<FinancialReport>> {
    Ok(Json(services.inventory.financial_insights().await?))
}

pub async fn stockout(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<StockoutReport>> {
    Ok(Json(services.inventory.stockout_predictions().await?))
}

pub async fn damaged(
    Extension(services): Extension<Arc<AppServices>>,
) -> ApiResult<Json<DamageReport>> {
    Ok(Json(services.inventory.damaged_report().await?))
}

pub async fn dead_stock(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::DeadStockQuery>, QueryRejection>,
) -> ApiResult<Json<DeadStockReport>> {
    let Query(query) = query?;
    let days = query.days.unwrap_or(DEFAULT_LOOKBACK_DAYS);
    Ok(Json(services.inventory.dead_stock(days).await?))
}

pub async fn mark_damaged(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<dto::MarkDamagedRequest>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let Json(body) = body?;
    let id = parse_product_id(&body.product_id)?;
    let product = services
        .inventory
        .mark_as_damaged(id, body.quantity, &body.reason)
        .await?;
    Ok(Json(product))
}

pub async fn write_off_damaged(
    Extension(services): Extension<Arc<AppServices>>,
    Path(product_id): Path<String>,
) -> ApiResult<Json<WriteOff>> {
    let id = parse_product_id(&product_id)?;
    Ok(Json(services.inventory.write_off_damaged(id).await?))
}
