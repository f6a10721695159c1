//! Demo sales generator.

use std::ops::RangeInclusive;

use chrono::{DateTime, Duration, Utc};
use rand::Rng;

use stocksense_core::SaleId;
use stocksense_products::Product;
use stocksense_sales::Sale;

/// Shape of the generated sales history.
#[derive(Debug, Clone)]
pub struct SeedPlan {
    pub sales_per_product: RangeInclusive<u32>,
    pub units_per_sale: RangeInclusive<u32>,
    /// Whole days before `now`; 0 is today.
    pub days_ago: RangeInclusive<i64>,
}

impl Default for SeedPlan {
    fn default() -> Self {
        Self {
            sales_per_product: 5..=15,
            units_per_sale: 1..=15,
            days_ago: 0..=6,
        }
    }
}

/// Random sales for every product, dated relative to `now`.
pub fn generate_demo_sales<R: Rng>(
    rng: &mut R,
    products: &[Product],
    plan: &SeedPlan,
    now: DateTime<Utc>,
) -> Vec<Sale> {
    let mut sales = Vec::new();
    for product in products {
        let count = rng.random_range(plan.sales_per_product.clone());
        for _ in 0..count {
            let quantity = rng.random_range(plan.units_per_sale.clone());
            let sold_at = now - Duration::days(rng.random_range(plan.days_ago.clone()));
            sales.push(Sale {
                id: SaleId::new(),
                product_id: product.id,
                quantity,
                sold_at,
            });
        }
    }
    sales
}
