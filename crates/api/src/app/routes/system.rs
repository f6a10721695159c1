use axum::http::StatusCode;

pub async fn banner() -> &'static str {
    "Inventory Intelligence API is running"
}

pub async fn health() -> StatusCode {
    StatusCode::OK
}
