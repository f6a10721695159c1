use std::sync::Arc;

use stocksense_infra::{InMemoryStore, InsightSettings, InventoryService, InventoryStore, StoreError};

use crate::config::{AppConfig, StorageBackend};

/// Everything the handlers share.
#[derive(Clone)]
pub struct AppServices {
    pub inventory: InventoryService,
}

impl AppServices {
    pub fn new(store: Arc<dyn InventoryStore>, settings: InsightSettings) -> Self {
        Self {
            inventory: InventoryService::new(store, settings),
        }
    }

    /// In-memory services, for tests and local runs.
    pub fn in_memory(settings: InsightSettings) -> Self {
        Self::new(Arc::new(InMemoryStore::new()), settings)
    }
}

/// Build services for the configured storage backend.
pub async fn build_services(config: &AppConfig) -> Result<AppServices, StoreError> {
    let store: Arc<dyn InventoryStore> = match &config.storage {
        StorageBackend::Memory => Arc::new(InMemoryStore::new()),
        StorageBackend::Postgres { database_url } => postgres_store(database_url).await?,
    };
    Ok(AppServices::new(store, config.insights))
}

#[cfg(feature = "postgres")]
async fn postgres_store(database_url: &str) -> Result<Arc<dyn InventoryStore>, StoreError> {
    let store = stocksense_infra::PostgresStore::connect(database_url).await?;
    store.migrate().await?;
    tracing::info!("using postgres storage");
    Ok(Arc::new(store))
}

#[cfg(not(feature = "postgres"))]
async fn postgres_store(_database_url: &str) -> Result<Arc<dyn InventoryStore>, StoreError> {
    tracing::warn!(
        "STOCKSENSE_STORAGE=postgres but postgres feature not enabled, falling back to in-memory"
    );
    Ok(Arc::new(InMemoryStore::new()))
}
