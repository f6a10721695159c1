//! Per-product sales sums.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use stocksense_core::ProductId;

use crate::sale::Sale;

/// Units sold and number of sale records for one product.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductSalesTotal {
    pub product_id: ProductId,
    pub total_sold: u64,
    pub sales_count: u64,
}

/// Sales grouped by product.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesTotals {
    by_product: HashMap<ProductId, ProductSalesTotal>,
}

impl SalesTotals {
    pub fn from_sales<'a>(sales: impl IntoIterator<Item = &'a Sale>) -> Self {
        let mut totals = Self::default();
        for sale in sales {
            totals.add(sale.product_id, u64::from(sale.quantity), 1);
        }
        totals
    }

    /// Build from rows that were already grouped elsewhere (e.g. by a database).
    pub fn from_totals(rows: impl IntoIterator<Item = ProductSalesTotal>) -> Self {
        let mut totals = Self::default();
        for row in rows {
            totals.add(row.product_id, row.total_sold, row.sales_count);
        }
        totals
    }

    fn add(&mut self, product_id: ProductId, units: u64, count: u64) {
        let entry = self
            .by_product
            .entry(product_id)
            .or_insert(ProductSalesTotal {
                product_id,
                total_sold: 0,
                sales_count: 0,
            });
        entry.total_sold += units;
        entry.sales_count += count;
    }

    pub fn get(&self, product_id: &ProductId) -> Option<&ProductSalesTotal> {
        self.by_product.get(product_id)
    }

    /// Units sold for a product, 0 when it has no sales.
    pub fn units_for(&self, product_id: &ProductId) -> u64 {
        self.get(product_id).map(|t| t.total_sold).unwrap_or(0)
    }

    pub fn contains(&self, product_id: &ProductId) -> bool {
        self.by_product.contains_key(product_id)
    }

    /// All totals, highest `total_sold` first; ties broken by product id.
    pub fn ranked(&self) -> Vec<ProductSalesTotal> {
        let mut rows: Vec<_> = self.by_product.values().copied().collect();
        rows.sort_by(|a, b| {
            b.total_sold
                .cmp(&a.total_sold)
                .then_with(|| a.product_id.cmp(&b.product_id))
        });
        rows
    }
}
