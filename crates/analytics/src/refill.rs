//! Refill advisor: per-product REFILL_NOW / STOP_REORDER / HOLD decisions.

use serde::Serialize;

use stocksense_core::ProductId;
use stocksense_products::Product;

use crate::error::AnalyticsError;
use crate::insight::{Insight, SalesWindow};
use crate::snapshot::InventorySnapshot;
use crate::{round1, stockout};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RefillAction {
    RefillNow,
    StopReorder,
    Hold,
}

impl RefillAction {
    pub fn reason(self) -> &'static str {
        match self {
            RefillAction::RefillNow => "Stock below minimum threshold",
            RefillAction::StopReorder => "No sales detected recently",
            RefillAction::Hold => "Stock level is healthy",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Serialize)]
pub struct RefillAdvice {
    pub decision: RefillAction,
    pub reason: &'static str,
}

/// Decide for one product, rules in priority order:
/// below minimum, then no sales, then hold.
pub fn advise(product: &Product, avg_daily_sales: f64) -> RefillAdvice {
    let decision = if product.stock_quantity < product.min_stock_level {
        RefillAction::RefillNow
    } else if avg_daily_sales == 0.0 {
        RefillAction::StopReorder
    } else {
        RefillAction::Hold
    };
    RefillAdvice {
        decision,
        reason: decision.reason(),
    }
}

/// Where the advisor's average-daily-sales figure comes from.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VelocityPolicy {
    /// Flat 2 units/day for any product with stock, 0 otherwise.
    StockPresence,
    /// Units sold over the trailing `days` divided by `days`.
    Trailing { days: u32 },
}

impl Default for VelocityPolicy {
    fn default() -> Self {
        VelocityPolicy::Trailing {
            days: stockout::DEFAULT_WINDOW_DAYS,
        }
    }
}

const STOCK_PRESENCE_VELOCITY: f64 = 2.0;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RefillRecommendation {
    pub product_id: ProductId,
    pub name: String,
    pub stock: u32,
    pub avg_daily_sales: f64,
    pub decision: RefillAdvice,
}

/// One recommendation per product, in snapshot order.
#[derive(Debug, Copy, Clone, Default)]
pub struct RefillAdvisor {
    policy: VelocityPolicy,
}

impl RefillAdvisor {
    pub fn new(policy: VelocityPolicy) -> Self {
        Self { policy }
    }
}

impl Insight for RefillAdvisor {
    type Output = Vec<RefillRecommendation>;

    fn kind(&self) -> &'static str {
        "refill.decisions"
    }

    fn sales_window(&self) -> SalesWindow {
        match self.policy {
            VelocityPolicy::StockPresence => SalesWindow::None,
            VelocityPolicy::Trailing { days } => SalesWindow::Totals { days },
        }
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        let velocity: Box<dyn Fn(&Product) -> f64> = match self.policy {
            VelocityPolicy::StockPresence => Box::new(|p: &Product| {
                if p.stock_quantity > 0 {
                    STOCK_PRESENCE_VELOCITY
                } else {
                    0.0
                }
            }),
            VelocityPolicy::Trailing { days } => {
                if days == 0 {
                    return Err(AnalyticsError::InvalidInput(
                        "velocity window must be at least one day".to_string(),
                    ));
                }
                let totals = snapshot.totals_within(days)?.into_owned();
                Box::new(move |p: &Product| totals.units_for(&p.id) as f64 / f64::from(days))
            }
        };

        Ok(snapshot
            .products()
            .iter()
            .map(|p| {
                let avg = velocity(p);
                RefillRecommendation {
                    product_id: p.id,
                    name: p.name.clone(),
                    stock: p.stock_quantity,
                    avg_daily_sales: round1(avg),
                    decision: advise(p, avg),
                }
            })
            .collect())
    }
}
