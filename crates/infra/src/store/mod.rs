//! Product and sale persistence.
//!
//! Analytics never touch a store directly: the service loads what an insight
//! needs through [`InventoryStore`] and hands it a snapshot.

use chrono::{DateTime, Utc};
use thiserror::Error;

use stocksense_core::ProductId;
use stocksense_products::Product;
use stocksense_sales::{Sale, SalesTotals};

pub mod in_memory;
#[cfg(feature = "postgres")]
pub mod postgres;

pub use in_memory::InMemoryStore;
#[cfg(feature = "postgres")]
pub use postgres::PostgresStore;

/// Storage failure.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The backend could not be reached or rejected the operation.
    #[error("storage backend error: {0}")]
    Backend(String),

    /// A stored record could not be decoded.
    #[error("corrupt record: {0}")]
    Corrupt(String),
}

/// Narrows [`InventoryStore::list_products`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductFilter {
    /// Exact category match.
    pub category: Option<String>,
    /// Only products holding damaged units.
    pub damaged_only: bool,
}

impl ProductFilter {
    pub fn category(category: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            ..Self::default()
        }
    }

    pub fn damaged() -> Self {
        Self {
            damaged_only: true,
            ..Self::default()
        }
    }

    pub fn matches(&self, product: &Product) -> bool {
        if self.damaged_only && product.damaged_quantity == 0 {
            return false;
        }
        match &self.category {
            Some(category) => product.category == *category,
            None => true,
        }
    }
}

/// Product and sale records.
///
/// Writes are last-writer-wins; nothing here spans more than one call.
#[async_trait::async_trait]
pub trait InventoryStore: Send + Sync {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, StoreError>;

    /// Insert or replace by id.
    async fn save_product(&self, product: Product) -> Result<(), StoreError>;

    /// Remove a product and return it. Sales referencing it are kept.
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError>;

    /// Returns how many sales were inserted.
    async fn insert_sales(&self, sales: Vec<Sale>) -> Result<usize, StoreError>;

    /// Sales with `sold_at >= since`.
    async fn list_sales_since(&self, since: DateTime<Utc>) -> Result<Vec<Sale>, StoreError>;

    /// Per-product totals of sales with `sold_at >= since`.
    async fn sales_totals_since(&self, since: DateTime<Utc>) -> Result<SalesTotals, StoreError> {
        let sales = self.list_sales_since(since).await?;
        Ok(SalesTotals::from_sales(&sales))
    }

    /// Returns how many sales were deleted.
    async fn delete_all_sales(&self) -> Result<u64, StoreError>;
}
