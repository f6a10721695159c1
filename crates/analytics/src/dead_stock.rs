use serde::Serialize;

use stocksense_core::ProductId;

use crate::error::AnalyticsError;
use crate::insight::{Insight, SalesWindow};
use crate::snapshot::InventorySnapshot;

pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadStockItem {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub stock_quantity: u32,
    pub cost_price: f64,
    pub selling_price: f64,
    pub stock_value: f64,
    /// Capital tied up; equal to `stock_value`.
    pub potential_loss: f64,
    /// Lower bound: the product has not sold for at least this many days.
    pub days_without_sale: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeadStockReport {
    pub days_threshold: u32,
    pub total_products: usize,
    pub total_dead_stock_value: f64,
    pub total_dead_stock_units: u64,
    pub products: Vec<DeadStockItem>,
}

/// Stocked products with no sale inside the lookback window.
#[derive(Debug, Copy, Clone)]
pub struct DeadStockDetector {
    days: u32,
}

impl Default for DeadStockDetector {
    fn default() -> Self {
        Self::new(DEFAULT_LOOKBACK_DAYS)
    }
}

impl DeadStockDetector {
    pub fn new(days: u32) -> Self {
        Self { days }
    }
}

impl Insight for DeadStockDetector {
    type Output = DeadStockReport;

    fn kind(&self) -> &'static str {
        "dead_stock.report"
    }

    fn sales_window(&self) -> SalesWindow {
        SalesWindow::Totals { days: self.days }
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        let sold = snapshot.totals_within(self.days)?;

        let mut products: Vec<DeadStockItem> = snapshot
            .products()
            .iter()
            .filter(|p| p.stock_quantity > 0 && !sold.contains(&p.id))
            .map(|p| {
                let value = p.stock_value();
                DeadStockItem {
                    id: p.id,
                    name: p.name.clone(),
                    sku: p.sku.clone(),
                    category: p.category.clone(),
                    stock_quantity: p.stock_quantity,
                    cost_price: p.cost_price,
                    selling_price: p.selling_price,
                    stock_value: value,
                    potential_loss: value,
                    days_without_sale: self.days,
                }
            })
            .collect();

        products.sort_by(|a, b| b.stock_value.total_cmp(&a.stock_value));

        Ok(DeadStockReport {
            days_threshold: self.days,
            total_products: products.len(),
            total_dead_stock_value: products.iter().map(|p| p.stock_value).sum(),
            total_dead_stock_units: products.iter().map(|p| u64::from(p.stock_quantity)).sum(),
            products,
        })
    }
}
