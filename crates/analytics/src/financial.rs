//! Margin and profit rollups over the current catalog.

use serde::Serialize;

use stocksense_core::ProductId;
use stocksense_products::Product;

use crate::error::AnalyticsError;
use crate::insight::{Insight, SalesWindow};
use crate::round1;
use crate::snapshot::InventorySnapshot;

const TOP_N: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductFinancials {
    pub product_id: ProductId,
    pub name: String,
    pub category: String,
    pub cost_price: f64,
    pub selling_price: f64,
    pub profit: f64,
    /// Percent of selling price, one decimal.
    pub margin: f64,
    pub stock_quantity: u32,
    pub stock_value: f64,
    pub potential_revenue: f64,
    pub potential_profit: f64,
}

impl ProductFinancials {
    pub fn from_product(p: &Product) -> Self {
        let profit = p.selling_price - p.cost_price;
        let stock = f64::from(p.stock_quantity);
        Self {
            product_id: p.id,
            name: p.name.clone(),
            category: p.category.clone(),
            cost_price: p.cost_price,
            selling_price: p.selling_price,
            profit,
            margin: margin_percent(p.cost_price, p.selling_price),
            stock_quantity: p.stock_quantity,
            stock_value: stock * p.cost_price,
            potential_revenue: stock * p.selling_price,
            potential_profit: stock * profit,
        }
    }
}

/// `(selling - cost) / selling * 100` to one decimal; 0 without a positive cost or price.
pub fn margin_percent(cost_price: f64, selling_price: f64) -> f64 {
    if cost_price <= 0.0 || selling_price <= 0.0 {
        return 0.0;
    }
    round1((selling_price - cost_price) / selling_price * 100.0)
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialTotals {
    pub total_products: usize,
    pub total_stock_value: f64,
    pub total_potential_revenue: f64,
    pub total_potential_profit: f64,
    /// Unweighted mean of product margins.
    pub average_margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryFinancials {
    pub name: String,
    pub revenue: f64,
    pub profit: f64,
    pub count: usize,
    pub margin: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FinancialReport {
    pub totals: FinancialTotals,
    pub top_by_margin: Vec<ProductFinancials>,
    pub top_by_profit: Vec<ProductFinancials>,
    pub by_category: Vec<CategoryFinancials>,
}

#[derive(Debug, Copy, Clone, Default)]
pub struct FinancialInsights;

impl Insight for FinancialInsights {
    type Output = FinancialReport;

    fn kind(&self) -> &'static str {
        "financial.insights"
    }

    fn sales_window(&self) -> SalesWindow {
        SalesWindow::None
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        let rows: Vec<ProductFinancials> = snapshot
            .products()
            .iter()
            .map(ProductFinancials::from_product)
            .collect();

        let average_margin = if rows.is_empty() {
            0.0
        } else {
            round1(rows.iter().map(|r| r.margin).sum::<f64>() / rows.len() as f64)
        };
        let totals = FinancialTotals {
            total_products: rows.len(),
            total_stock_value: rows.iter().map(|r| r.stock_value).sum(),
            total_potential_revenue: rows.iter().map(|r| r.potential_revenue).sum(),
            total_potential_profit: rows.iter().map(|r| r.potential_profit).sum(),
            average_margin,
        };

        let mut top_by_margin = rows.clone();
        top_by_margin.sort_by(|a, b| b.margin.total_cmp(&a.margin));
        top_by_margin.truncate(TOP_N);

        let mut top_by_profit = rows.clone();
        top_by_profit.sort_by(|a, b| b.potential_profit.total_cmp(&a.potential_profit));
        top_by_profit.truncate(TOP_N);

        Ok(FinancialReport {
            totals,
            top_by_margin,
            top_by_profit,
            by_category: by_category(&rows),
        })
    }
}

/// Categories in first-seen order, then stably sorted by profit descending.
fn by_category(rows: &[ProductFinancials]) -> Vec<CategoryFinancials> {
    let mut categories: Vec<CategoryFinancials> = Vec::new();
    for row in rows {
        let idx = match categories.iter().position(|c| c.name == row.category) {
            Some(idx) => idx,
            None => {
                categories.push(CategoryFinancials {
                    name: row.category.clone(),
                    revenue: 0.0,
                    profit: 0.0,
                    count: 0,
                    margin: 0.0,
                });
                categories.len() - 1
            }
        };
        let c = &mut categories[idx];
        c.revenue += row.potential_revenue;
        c.profit += row.potential_profit;
        c.count += 1;
    }
    for c in &mut categories {
        c.margin = if c.revenue > 0.0 {
            round1(c.profit / c.revenue * 100.0)
        } else {
            0.0
        };
    }
    categories.sort_by(|a, b| b.profit.total_cmp(&a.profit));
    categories
}
