use std::sync::Arc;

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Extension, Path, Query,
    },
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};

use stocksense_infra::ProductFilter;
use stocksense_products::{NewProduct, Product, ProductPatch};

use crate::app::dto;
use crate::app::routes::common::{parse_product_id, ApiResult};
use crate::app::services::AppServices;

pub fn router() -> Router {
    Router::new()
        .route("/", get(list_products).post(add_product))
        .route(
            "/:id",
            get(get_product).put(update_product).delete(delete_product),
        )
        .route("/:id/stock", patch(update_stock))
}

pub async fn list_products(
    Extension(services): Extension<Arc<AppServices>>,
    query: Result<Query<dto::CategoryQuery>, QueryRejection>,
) -> ApiResult<Json<Vec<Product>>> {
    let Query(query) = query?;
    let filter = match query.category {
        Some(category) if !category.trim().is_empty() => ProductFilter::category(category),
        _ => ProductFilter::default(),
    };
    Ok(Json(services.inventory.list_products(filter).await?))
}

pub async fn add_product(
    Extension(services): Extension<Arc<AppServices>>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Product>)> {
    let Json(body) = body?;
    let product = services.inventory.add_product(body).await?;
    Ok((StatusCode::CREATED, Json(product)))
}

pub async fn get_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<Product>> {
    let id = parse_product_id(&id)?;
    Ok(Json(services.inventory.get_product(id).await?))
}

pub async fn update_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = parse_product_id(&id)?;
    let Json(patch) = body?;
    Ok(Json(services.inventory.update_product(id, patch).await?))
}

pub async fn update_stock(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
    body: Result<Json<dto::StockUpdateRequest>, JsonRejection>,
) -> ApiResult<Json<Product>> {
    let id = parse_product_id(&id)?;
    let Json(body) = body?;
    let quantity = body.quantity()?;
    Ok(Json(services.inventory.update_stock(id, quantity).await?))
}

pub async fn delete_product(
    Extension(services): Extension<Arc<AppServices>>,
    Path(id): Path<String>,
) -> ApiResult<Json<dto::DeleteProductResponse>> {
    let id = parse_product_id(&id)?;
    let product = services.inventory.delete_product(id).await?;
    Ok(Json(dto::DeleteProductResponse {
        message: "Product deleted",
        product,
    }))
}
