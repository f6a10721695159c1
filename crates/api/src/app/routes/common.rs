use stocksense_core::ProductId;

use crate::app::errors::ApiError;

pub type ApiResult<T> = Result<T, ApiError>;

/// Parse a path or body id, answering 400 on malformed input.
pub fn parse_product_id(raw: &str) -> ApiResult<ProductId> {
    Ok(raw.trim().parse::<ProductId>()?)
}
