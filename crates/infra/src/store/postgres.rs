//! Postgres-backed inventory store.
//!
//! ## Schema
//!
//! `products` holds one row per product with the damage history as JSONB.
//! `sales` holds one row per sale; `product_id` carries no foreign key so that
//! deleting a product leaves its sales in place.
//!
//! ## Error Mapping
//!
//! | SQLx Error | StoreError |
//! |------------|------------|
//! | `Database`, `PoolClosed`, IO and others | `Backend` |
//! | `ColumnDecode` / out-of-range counters | `Corrupt` |

use std::sync::Arc;

use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::types::Json;
use sqlx::{PgPool, Row};
use tracing::instrument;

use stocksense_core::{ProductId, SaleId};
use stocksense_products::{DamageEntry, Product};
use stocksense_sales::{ProductSalesTotal, Sale, SalesTotals};

use super::{InventoryStore, ProductFilter, StoreError};

const SCHEMA: [&str; 3] = [
    r#"
    CREATE TABLE IF NOT EXISTS products (
        id UUID PRIMARY KEY,
        name TEXT NOT NULL,
        sku TEXT NOT NULL,
        category TEXT NOT NULL,
        stock_quantity BIGINT NOT NULL CHECK (stock_quantity >= 0),
        cost_price DOUBLE PRECISION NOT NULL,
        selling_price DOUBLE PRECISION NOT NULL,
        min_stock_level BIGINT NOT NULL CHECK (min_stock_level >= 0),
        damaged_quantity BIGINT NOT NULL DEFAULT 0 CHECK (damaged_quantity >= 0),
        damage_history JSONB NOT NULL DEFAULT '[]'::jsonb,
        created_at TIMESTAMPTZ NOT NULL,
        updated_at TIMESTAMPTZ NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS sales (
        id UUID PRIMARY KEY,
        product_id UUID NOT NULL,
        quantity BIGINT NOT NULL CHECK (quantity > 0),
        sold_at TIMESTAMPTZ NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS sales_sold_at_idx ON sales (sold_at)",
];

const PRODUCT_COLUMNS: &str = "id, name, sku, category, stock_quantity, cost_price, selling_price, \
     min_stock_level, damaged_quantity, damage_history, created_at, updated_at";

/// Postgres-backed [`InventoryStore`].
///
/// `Send + Sync`; all calls go through the SQLx pool.
#[derive(Debug, Clone)]
pub struct PostgresStore {
    pool: Arc<PgPool>,
}

impl PostgresStore {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool: Arc::new(pool),
        }
    }

    /// Connect to `database_url` with a default pool.
    pub async fn connect(database_url: &str) -> Result<Self, StoreError> {
        let pool = PgPool::connect(database_url)
            .await
            .map_err(|e| map_sqlx_error("connect", e))?;
        Ok(Self::new(pool))
    }

    /// Create tables and indexes if missing. Safe to run on every start.
    #[instrument(skip(self), err)]
    pub async fn migrate(&self) -> Result<(), StoreError> {
        for statement in SCHEMA {
            sqlx::query(statement)
                .execute(&*self.pool)
                .await
                .map_err(|e| map_sqlx_error("migrate", e))?;
        }
        Ok(())
    }
}

#[async_trait::async_trait]
impl InventoryStore for PostgresStore {
    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn find_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!("SELECT {PRODUCT_COLUMNS} FROM products WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("find_product", e))?;

        row.map(|r| product_from_row(&r)).transpose()
    }

    #[instrument(skip(self), err)]
    async fn list_products(&self, filter: ProductFilter) -> Result<Vec<Product>, StoreError> {
        let rows = sqlx::query(&format!(
            r#"
            SELECT {PRODUCT_COLUMNS}
            FROM products
            WHERE ($1::text IS NULL OR category = $1)
                AND (NOT $2 OR damaged_quantity > 0)
            ORDER BY id ASC
            "#
        ))
        .bind(filter.category.as_deref())
        .bind(filter.damaged_only)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_products", e))?;

        rows.iter().map(product_from_row).collect()
    }

    #[instrument(skip(self, product), fields(product_id = %product.id), err)]
    async fn save_product(&self, product: Product) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, sku, category, stock_quantity, cost_price, selling_price,
                min_stock_level, damaged_quantity, damage_history, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
            ON CONFLICT (id)
            DO UPDATE SET
                name = EXCLUDED.name,
                sku = EXCLUDED.sku,
                category = EXCLUDED.category,
                stock_quantity = EXCLUDED.stock_quantity,
                cost_price = EXCLUDED.cost_price,
                selling_price = EXCLUDED.selling_price,
                min_stock_level = EXCLUDED.min_stock_level,
                damaged_quantity = EXCLUDED.damaged_quantity,
                damage_history = EXCLUDED.damage_history,
                updated_at = EXCLUDED.updated_at
            "#,
        )
        .bind(product.id.as_uuid())
        .bind(&product.name)
        .bind(&product.sku)
        .bind(&product.category)
        .bind(i64::from(product.stock_quantity))
        .bind(product.cost_price)
        .bind(product.selling_price)
        .bind(i64::from(product.min_stock_level))
        .bind(i64::from(product.damaged_quantity))
        .bind(Json(&product.damage_history))
        .bind(product.created_at)
        .bind(product.updated_at)
        .execute(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("save_product", e))?;
        Ok(())
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    async fn delete_product(&self, id: ProductId) -> Result<Option<Product>, StoreError> {
        let row = sqlx::query(&format!(
            "DELETE FROM products WHERE id = $1 RETURNING {PRODUCT_COLUMNS}"
        ))
        .bind(id.as_uuid())
        .fetch_optional(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("delete_product", e))?;

        row.map(|r| product_from_row(&r)).transpose()
    }

    #[instrument(skip(self, sales), fields(count = sales.len()), err)]
    async fn insert_sales(&self, sales: Vec<Sale>) -> Result<usize, StoreError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| map_sqlx_error("insert_sales", e))?;

        for sale in &sales {
            sqlx::query("INSERT INTO sales (id, product_id, quantity, sold_at) VALUES ($1, $2, $3, $4)")
                .bind(sale.id.as_uuid())
                .bind(sale.product_id.as_uuid())
                .bind(i64::from(sale.quantity))
                .bind(sale.sold_at)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_sqlx_error("insert_sales", e))?;
        }

        tx.commit()
            .await
            .map_err(|e| map_sqlx_error("insert_sales", e))?;
        Ok(sales.len())
    }

    #[instrument(skip(self), err)]
    async fn list_sales_since(&self, since: DateTime<Utc>) -> Result<Vec<Sale>, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT id, product_id, quantity, sold_at
            FROM sales
            WHERE sold_at >= $1
            ORDER BY sold_at ASC, id ASC
            "#,
        )
        .bind(since)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("list_sales_since", e))?;

        rows.iter()
            .map(|row| -> Result<Sale, StoreError> {
                Ok(Sale {
                    id: SaleId::from_uuid(row.try_get("id").map_err(decode_error)?),
                    product_id: ProductId::from_uuid(row.try_get("product_id").map_err(decode_error)?),
                    quantity: counter(row, "quantity")?,
                    sold_at: row.try_get("sold_at").map_err(decode_error)?,
                })
            })
            .collect()
    }

    #[instrument(skip(self), err)]
    async fn sales_totals_since(&self, since: DateTime<Utc>) -> Result<SalesTotals, StoreError> {
        let rows = sqlx::query(
            r#"
            SELECT product_id, SUM(quantity)::BIGINT AS total_sold, COUNT(*) AS sales_count
            FROM sales
            WHERE sold_at >= $1
            GROUP BY product_id
            "#,
        )
        .bind(since)
        .fetch_all(&*self.pool)
        .await
        .map_err(|e| map_sqlx_error("sales_totals_since", e))?;

        let totals = rows
            .iter()
            .map(|row| -> Result<ProductSalesTotal, StoreError> {
                Ok(ProductSalesTotal {
                    product_id: ProductId::from_uuid(row.try_get("product_id").map_err(decode_error)?),
                    total_sold: wide_counter(row, "total_sold")?,
                    sales_count: wide_counter(row, "sales_count")?,
                })
            })
            .collect::<Result<Vec<_>, StoreError>>()?;

        Ok(SalesTotals::from_totals(totals))
    }

    #[instrument(skip(self), err)]
    async fn delete_all_sales(&self) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM sales")
            .execute(&*self.pool)
            .await
            .map_err(|e| map_sqlx_error("delete_all_sales", e))?;
        Ok(result.rows_affected())
    }
}

fn product_from_row(row: &PgRow) -> Result<Product, StoreError> {
    let Json(damage_history): Json<Vec<DamageEntry>> =
        row.try_get("damage_history").map_err(decode_error)?;

    Ok(Product {
        id: ProductId::from_uuid(row.try_get("id").map_err(decode_error)?),
        name: row.try_get("name").map_err(decode_error)?,
        sku: row.try_get("sku").map_err(decode_error)?,
        category: row.try_get("category").map_err(decode_error)?,
        stock_quantity: counter(row, "stock_quantity")?,
        cost_price: row.try_get("cost_price").map_err(decode_error)?,
        selling_price: row.try_get("selling_price").map_err(decode_error)?,
        min_stock_level: counter(row, "min_stock_level")?,
        damaged_quantity: counter(row, "damaged_quantity")?,
        damage_history,
        created_at: row.try_get("created_at").map_err(decode_error)?,
        updated_at: row.try_get("updated_at").map_err(decode_error)?,
    })
}

/// BIGINT column holding a `u32` counter.
fn counter(row: &PgRow, column: &str) -> Result<u32, StoreError> {
    let raw: i64 = row.try_get(column).map_err(decode_error)?;
    u32::try_from(raw).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {raw}")))
}

fn wide_counter(row: &PgRow, column: &str) -> Result<u64, StoreError> {
    let raw: i64 = row.try_get(column).map_err(decode_error)?;
    u64::try_from(raw).map_err(|_| StoreError::Corrupt(format!("{column} out of range: {raw}")))
}

fn decode_error(err: sqlx::Error) -> StoreError {
    StoreError::Corrupt(err.to_string())
}

fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            StoreError::Backend(format!("database error in {}: {}", operation, db_err.message()))
        }
        sqlx::Error::PoolClosed => {
            StoreError::Backend(format!("connection pool closed in {}", operation))
        }
        sqlx::Error::ColumnDecode { .. } | sqlx::Error::Decode(_) => {
            StoreError::Corrupt(format!("decode error in {}: {}", operation, err))
        }
        _ => StoreError::Backend(format!("sqlx error in {}: {}", operation, err)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_closed_maps_to_backend() {
        let err = map_sqlx_error("list_products", sqlx::Error::PoolClosed);
        assert_eq!(
            err,
            StoreError::Backend("connection pool closed in list_products".to_string())
        );
    }

    #[test]
    fn schema_is_idempotent() {
        assert!(SCHEMA.iter().all(|s| s.contains("IF NOT EXISTS")));
    }
}
