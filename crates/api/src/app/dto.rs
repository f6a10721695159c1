use serde::{Deserialize, Serialize};

use stocksense_products::Product;
use stocksense_sales::NewSale;

use crate::app::errors::ApiError;

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockUpdateRequest {
    pub stock_quantity: Option<i64>,
}

impl StockUpdateRequest {
    pub fn quantity(&self) -> Result<i64, ApiError> {
        self.stock_quantity
            .ok_or_else(|| ApiError::Validation("valid stockQuantity is required".to_string()))
    }
}

#[derive(Debug, Deserialize)]
pub struct RecordSalesRequest {
    pub sales: Vec<NewSale>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkDamagedRequest {
    pub product_id: String,
    pub quantity: u32,
    #[serde(default = "default_damage_reason")]
    pub reason: String,
}

fn default_damage_reason() -> String {
    "other".to_string()
}

#[derive(Debug, Default, Deserialize)]
pub struct CategoryQuery {
    pub category: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct DeadStockQuery {
    pub days: Option<u32>,
}

// -------------------------
// Response DTOs
// -------------------------

#[derive(Debug, Serialize)]
pub struct DeleteProductResponse {
    pub message: &'static str,
    pub product: Product,
}

#[derive(Debug, Serialize)]
pub struct ClearSalesResponse {
    pub message: String,
    pub deleted: u64,
}

impl ClearSalesResponse {
    pub fn new(deleted: u64) -> Self {
        Self {
            message: format!("Deleted {deleted} sales records"),
            deleted,
        }
    }
}
