//! Application service over an [`InventoryStore`].
//!
//! One method per external operation. Each loads what it needs from the store
//! once, applies a domain transition or runs an [`Insight`], and writes back.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use tracing::instrument;

use stocksense_analytics::stockout::DEFAULT_WINDOW_DAYS;
use stocksense_analytics::{
    AnalyticsError, DailyProductTrend, DailyTotal, DailyTotals, DailyTrends, DamageReport,
    DamagedInventory, DeadStockDetector, DeadStockReport, FinancialInsights, FinancialReport,
    Insight, InventorySnapshot, RefillAdvisor, RefillRecommendation, SalesWindow,
    StockoutPredictor, StockoutReport, VelocityPolicy, WeeklyTrend, WeeklyTrends,
};
use stocksense_core::{DomainError, ProductId, SaleId};
use stocksense_products::{NewProduct, Product, ProductPatch};
use stocksense_sales::{NewSale, Sale};

use crate::seed::{SeedPlan, generate_demo_sales};
use crate::store::{InventoryStore, ProductFilter, StoreError};

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    Domain(#[from] DomainError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Analytics(#[from] AnalyticsError),
}

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Tunables for the sales-driven insights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InsightSettings {
    /// Where refill decisions get their average daily sales.
    pub velocity: VelocityPolicy,
    /// Trailing window for stockout forecasts.
    pub stockout_window_days: u32,
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            velocity: VelocityPolicy::default(),
            stockout_window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

/// Result of writing off a product's damaged units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WriteOff {
    pub product_id: ProductId,
    pub written_off: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeedSummary {
    pub products: usize,
    pub sales_inserted: usize,
    pub daily_totals: Vec<DailyTotal>,
}

#[derive(Clone)]
pub struct InventoryService {
    store: Arc<dyn InventoryStore>,
    settings: InsightSettings,
}

impl InventoryService {
    pub fn new(store: Arc<dyn InventoryStore>, settings: InsightSettings) -> Self {
        Self { store, settings }
    }

    // -- catalog --

    pub async fn list_products(&self, filter: ProductFilter) -> ServiceResult<Vec<Product>> {
        Ok(self.store.list_products(filter).await?)
    }

    pub async fn get_product(&self, id: ProductId) -> ServiceResult<Product> {
        self.store
            .find_product(id)
            .await?
            .ok_or_else(|| DomainError::product_not_found().into())
    }

    #[instrument(skip(self, input), fields(sku = %input.sku), err)]
    pub async fn add_product(&self, input: NewProduct) -> ServiceResult<Product> {
        let product = Product::create(ProductId::new(), input, Utc::now())?;
        self.store.save_product(product.clone()).await?;
        tracing::info!(product_id = %product.id, "product added");
        Ok(product)
    }

    #[instrument(skip(self, patch), fields(product_id = %id), err)]
    pub async fn update_product(&self, id: ProductId, patch: ProductPatch) -> ServiceResult<Product> {
        let mut product = self.get_product(id).await?;
        product.apply_patch(patch, Utc::now())?;
        self.store.save_product(product.clone()).await?;
        Ok(product)
    }

    /// Overwrite on-hand stock. Negative quantities are rejected before lookup.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn update_stock(&self, id: ProductId, stock_quantity: i64) -> ServiceResult<Product> {
        if stock_quantity < 0 {
            return Err(DomainError::validation("valid stockQuantity is required").into());
        }
        let mut product = self.get_product(id).await?;
        product.set_stock(stock_quantity, Utc::now())?;
        self.store.save_product(product.clone()).await?;
        Ok(product)
    }

    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn delete_product(&self, id: ProductId) -> ServiceResult<Product> {
        let removed = self
            .store
            .delete_product(id)
            .await?
            .ok_or_else(DomainError::product_not_found)?;
        tracing::info!(product_id = %id, "product deleted");
        Ok(removed)
    }

    // -- sales --

    /// Bulk-record sales. Every referenced product must exist.
    #[instrument(skip(self, input), fields(count = input.len()), err)]
    pub async fn record_sales(&self, input: Vec<NewSale>) -> ServiceResult<Vec<Sale>> {
        let now = Utc::now();
        let mut sales = Vec::with_capacity(input.len());
        for new_sale in input {
            if self.store.find_product(new_sale.product_id).await?.is_none() {
                return Err(DomainError::product_not_found().into());
            }
            sales.push(Sale::record(
                SaleId::new(),
                new_sale.product_id,
                new_sale.quantity,
                new_sale.sold_at.unwrap_or(now),
            )?);
        }
        self.store.insert_sales(sales.clone()).await?;
        Ok(sales)
    }

    /// Replace all sales with a random week of demo history.
    #[instrument(skip(self), err)]
    pub async fn seed_demo_sales(&self) -> ServiceResult<SeedSummary> {
        let products = self.store.list_products(ProductFilter::default()).await?;
        if products.is_empty() {
            return Err(DomainError::validation("no products found, add products first").into());
        }

        let cleared = self.store.delete_all_sales().await?;
        let sales = {
            let mut rng = rand::rng();
            generate_demo_sales(&mut rng, &products, &SeedPlan::default(), Utc::now())
        };
        let inserted = self.store.insert_sales(sales).await?;
        tracing::info!(cleared, inserted, products = products.len(), "demo sales seeded");

        Ok(SeedSummary {
            products: products.len(),
            sales_inserted: inserted,
            daily_totals: self.daily_totals().await?,
        })
    }

    #[instrument(skip(self), err)]
    pub async fn clear_sales(&self) -> ServiceResult<u64> {
        let deleted = self.store.delete_all_sales().await?;
        tracing::info!(deleted, "sales cleared");
        Ok(deleted)
    }

    // -- insights --

    pub async fn run_insight<I: Insight>(&self, insight: &I) -> ServiceResult<I::Output> {
        self.run_insight_at(insight, Utc::now()).await
    }

    /// Load the products plus whatever sales `insight` asks for, then run it.
    pub async fn run_insight_at<I: Insight>(
        &self,
        insight: &I,
        as_of: DateTime<Utc>,
    ) -> ServiceResult<I::Output> {
        self.run_insight_over(insight, ProductFilter::default(), as_of)
            .await
    }

    /// Like [`Self::run_insight_at`], over the products matching `filter` only.
    #[instrument(skip(self, insight), fields(kind = insight.kind()), err)]
    async fn run_insight_over<I: Insight>(
        &self,
        insight: &I,
        filter: ProductFilter,
        as_of: DateTime<Utc>,
    ) -> ServiceResult<I::Output> {
        let window = insight.sales_window();
        let since = window.since(as_of)?;
        let products = self.store.list_products(filter).await?;
        let snapshot = InventorySnapshot::new(as_of, products);
        let snapshot = match (window, since) {
            (SalesWindow::Records { .. }, Some(since)) => {
                snapshot.with_sales(since, self.store.list_sales_since(since).await?)
            }
            (SalesWindow::Totals { .. }, Some(since)) => {
                snapshot.with_totals(since, self.store.sales_totals_since(since).await?)
            }
            _ => snapshot,
        };
        Ok(insight.run(&snapshot)?)
    }

    pub async fn refill_decisions(&self) -> ServiceResult<Vec<RefillRecommendation>> {
        self.run_insight(&RefillAdvisor::new(self.settings.velocity)).await
    }

    pub async fn weekly_trends(&self) -> ServiceResult<Vec<WeeklyTrend>> {
        self.run_insight(&WeeklyTrends::default()).await
    }

    pub async fn daily_trends(&self) -> ServiceResult<Vec<DailyProductTrend>> {
        self.run_insight(&DailyTrends::default()).await
    }

    pub async fn daily_totals(&self) -> ServiceResult<Vec<DailyTotal>> {
        self.run_insight(&DailyTotals::default()).await
    }

    pub async fn financial_insights(&self) -> ServiceResult<FinancialReport> {
        self.run_insight(&FinancialInsights).await
    }

    pub async fn dead_stock(&self, days: u32) -> ServiceResult<DeadStockReport> {
        self.run_insight(&DeadStockDetector::new(days)).await
    }

    pub async fn stockout_predictions(&self) -> ServiceResult<StockoutReport> {
        let predictor = StockoutPredictor::default().with_window(self.settings.stockout_window_days);
        self.run_insight(&predictor).await
    }

    pub async fn damaged_report(&self) -> ServiceResult<DamageReport> {
        self.run_insight_over(&DamagedInventory, ProductFilter::damaged(), Utc::now())
            .await
    }

    // -- damage --

    /// Move `quantity` units from stock to damaged. Nothing is written on failure.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn mark_as_damaged(
        &self,
        id: ProductId,
        quantity: u32,
        reason: &str,
    ) -> ServiceResult<Product> {
        let mut product = self.get_product(id).await?;
        if let Err(e) = product.mark_damaged(quantity, reason, Utc::now()) {
            tracing::warn!(product_id = %id, quantity, error = %e, "damage request rejected");
            return Err(e.into());
        }
        self.store.save_product(product.clone()).await?;
        Ok(product)
    }

    /// Clear the damaged counter and its history.
    #[instrument(skip(self), fields(product_id = %id), err)]
    pub async fn write_off_damaged(&self, id: ProductId) -> ServiceResult<WriteOff> {
        let mut product = self.get_product(id).await?;
        let written_off = product.write_off_damaged(Utc::now());
        self.store.save_product(product).await?;
        tracing::info!(product_id = %id, written_off, "damaged stock written off");
        Ok(WriteOff {
            product_id: id,
            written_off,
        })
    }
}
