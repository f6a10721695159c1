use axum::{routing::get, Router};

pub mod admin;
pub mod analytics;
pub mod common;
pub mod inventory;
pub mod refill;
pub mod sales;
pub mod system;

/// Router for every endpoint. No authentication layer; CORS is permissive.
pub fn router() -> Router {
    Router::new()
        .route("/", get(system::banner))
        .route("/health", get(system::health))
        .nest("/api/inventory", inventory::router())
        .nest("/api/sales", sales::router())
        .nest("/api/refill", refill::router())
        .nest("/api/analytics", analytics::router())
        .nest("/api/admin", admin::router())
}
