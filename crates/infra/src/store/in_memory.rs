use std::collections::HashMap;
use std::hash::Hash;
use std::sync::RwLock;

use chrono::{DateTime, Utc};

use stocksense_core::{Entity, ProductId};
use stocksense_products::Product;
use stocksense_sales::Sale;

use super::{InventoryStore, ProductFilter, StoreError};

/// One table of records keyed by their entity id.
#[derive(Debug)]
struct Table<E: Entity> {
    inner: RwLock<HashMap<E::Id, E>>,
}

impl<E: Entity> Default for Table<E> {
    fn default() -> Self {
        Self {
            inner: RwLock::new(HashMap::new()),
        }
    }
}

impl<E> Table<E>
where
    E: Entity + Clone,
    E::Id: Ord + Hash,
{
    fn get(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        Ok(map.get(id).cloned())
    }

    /// Matching records ordered by id.
    fn scan(&self, pred: impl Fn(&E) -> bool) -> Result<Vec<E>, StoreError> {
        let map = self.inner.read().map_err(|_| poisoned())?;
        let mut rows: Vec<E> = map.values().filter(|r| pred(r)).cloned().collect();
        rows.sort_by_key(|r| r.id());
        Ok(rows)
    }

    fn upsert(&self, record: E) -> Result<(), StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        map.insert(record.id(), record);
        Ok(())
    }

    fn remove(&self, id: &E::Id) -> Result<Option<E>, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        Ok(map.remove(id))
    }

    fn insert_all(&self, records: Vec<E>) -> Result<usize, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let n = records.len();
        for r in records {
            map.insert(r.id(), r);
        }
        Ok(n)
    }

    fn clear(&self) -> Result<u64, StoreError> {
        let mut map = self.inner.write().map_err(|_| poisoned())?;
        let n = map.len() as u64;
        map.clear();
        Ok(n)
    }
}

fn poisoned() -> StoreError {
    StoreError::Backend("in-memory lock poisoned".to_string())
}

/// In-memory store for tests/dev.
#[derive(Debug, Default)]
pub struct InMemoryStore {
    products: Table<Product>,
    sales: Table<Sale>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait::async_trait]
impl InventoryStore for InMemoryStore {
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.products.get(&id)
    }

    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, StoreError> {
        self.products.scan(|p| filter.matches(p))
    }

    async fn save_product(&self, product: Product) -> Result<(), StoreError> {
        self.products.upsert(product)
    }

    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        self.products.remove(&id)
    }

    async fn insert_sales(&self, sales: Vec<Sale>) -> Result<usize, StoreError> {
        self.sales.insert_all(sales)
    }

    async fn list_sales_since(&self, since: DateTime<Utc>) -> Result<Vec<Sale>, StoreError> {
        self.sales.scan(|s| s.is_since(since))
    }

    async fn delete_all_sales(&self) -> Result<u64, StoreError> {
        self.sales.clear()
    }
}
