//! Infrastructure layer: storage backends, the inventory service, and demo data.

pub mod seed;
pub mod service;
pub mod store;

pub use service::{
    InsightSettings, InventoryService, SeedSummary, ServiceError, ServiceResult, WriteOff,
};
pub use store::{InMemoryStore, InventoryStore, ProductFilter, StoreError};
#[cfg(feature = "postgres")]
pub use store::PostgresStore;
