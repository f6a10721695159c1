//! Days-until-empty forecast from trailing sales velocity.

use serde::Serialize;

use stocksense_core::ProductId;

use crate::error::AnalyticsError;
use crate::insight::{Insight, SalesWindow};
use crate::round1;
use crate::snapshot::InventorySnapshot;

pub const DEFAULT_WINDOW_DAYS: u32 = 14;

/// Reported for stocked products that have not sold inside the window.
pub const NO_SALES_DAYS: u64 = 999;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StockoutStatus {
    Out,
    Critical,
    Warning,
    Attention,
    Safe,
    NoSales,
}

impl StockoutStatus {
    /// Sort rank, most urgent first.
    pub fn priority(self) -> u8 {
        match self {
            StockoutStatus::Out => 0,
            StockoutStatus::Critical => 1,
            StockoutStatus::Warning => 2,
            StockoutStatus::Attention => 3,
            StockoutStatus::Safe => 4,
            StockoutStatus::NoSales => 5,
        }
    }
}

/// Forecast for one product: `(days_until_stockout, status)`.
pub fn forecast(stock_quantity: u32, avg_daily_sales: f64) -> (u64, StockoutStatus) {
    if avg_daily_sales > 0.0 {
        let days = (f64::from(stock_quantity) / avg_daily_sales).round() as u64;
        let status = match days {
            0..=3 => StockoutStatus::Critical,
            4..=7 => StockoutStatus::Warning,
            8..=14 => StockoutStatus::Attention,
            _ => StockoutStatus::Safe,
        };
        (days, status)
    } else if stock_quantity == 0 {
        (0, StockoutStatus::Out)
    } else {
        (NO_SALES_DAYS, StockoutStatus::NoSales)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockoutPrediction {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub stock_quantity: u32,
    pub avg_daily_sales: f64,
    pub days_until_stockout: u64,
    pub status: StockoutStatus,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StockoutSummary {
    pub critical: usize,
    pub warning: usize,
    pub attention: usize,
    pub out_of_stock: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockoutReport {
    pub summary: StockoutSummary,
    pub predictions: Vec<StockoutPrediction>,
}

#[derive(Debug, Copy, Clone)]
pub struct StockoutPredictor {
    window_days: u32,
}

impl Default for StockoutPredictor {
    fn default() -> Self {
        Self {
            window_days: DEFAULT_WINDOW_DAYS,
        }
    }
}

impl StockoutPredictor {
    pub fn with_window(mut self, window_days: u32) -> Self {
        self.window_days = window_days;
        self
    }
}

impl Insight for StockoutPredictor {
    type Output = StockoutReport;

    fn kind(&self) -> &'static str {
        "stockout.predictions"
    }

    fn sales_window(&self) -> SalesWindow {
        SalesWindow::Totals {
            days: self.window_days,
        }
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        if self.window_days == 0 {
            return Err(AnalyticsError::InvalidInput(
                "stockout window must be at least one day".to_string(),
            ));
        }
        let totals = snapshot.totals_within(self.window_days)?;
        let window = f64::from(self.window_days);

        let mut predictions: Vec<StockoutPrediction> = snapshot
            .products()
            .iter()
            .map(|p| {
                let avg = totals.units_for(&p.id) as f64 / window;
                let (days, status) = forecast(p.stock_quantity, avg);
                StockoutPrediction {
                    id: p.id,
                    name: p.name.clone(),
                    sku: p.sku.clone(),
                    category: p.category.clone(),
                    stock_quantity: p.stock_quantity,
                    avg_daily_sales: round1(avg),
                    days_until_stockout: days,
                    status,
                }
            })
            .collect();

        predictions.sort_by(|a, b| {
            a.status
                .priority()
                .cmp(&b.status.priority())
                .then_with(|| a.days_until_stockout.cmp(&b.days_until_stockout))
        });

        let mut summary = StockoutSummary::default();
        for p in &predictions {
            match p.status {
                StockoutStatus::Critical => summary.critical += 1,
                StockoutStatus::Warning => summary.warning += 1,
                StockoutStatus::Attention => summary.attention += 1,
                StockoutStatus::Out => summary.out_of_stock += 1,
                StockoutStatus::Safe | StockoutStatus::NoSales => {}
            }
        }

        Ok(StockoutReport {
            summary,
            predictions,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::*;
    use crate::snapshot::window_start;

    #[test]
    fn steady_seller_with_four_weeks_of_stock_is_safe() {
        let p = product("Cement", 56, 0, 5.0, 8.0);
        let sales = vec![sale(&p, 14, 2), sale(&p, 14, 10)];
        let snapshot = InventorySnapshot::new(as_of(), vec![p])
            .with_sales(window_start(as_of(), 14).unwrap(), sales);

        let report = StockoutPredictor::default().run(&snapshot).unwrap();
        let prediction = &report.predictions[0];

        assert_eq!(prediction.avg_daily_sales, 2.0);
        assert_eq!(prediction.days_until_stockout, 28);
        assert_eq!(prediction.status, StockoutStatus::Safe);
    }

    #[test]
    fn thresholds_are_inclusive() {
        assert_eq!(forecast(3, 1.0).1, StockoutStatus::Critical);
        assert_eq!(forecast(4, 1.0).1, StockoutStatus::Warning);
        assert_eq!(forecast(7, 1.0).1, StockoutStatus::Warning);
        assert_eq!(forecast(14, 1.0).1, StockoutStatus::Attention);
        assert_eq!(forecast(15, 1.0).1, StockoutStatus::Safe);
    }

    #[test]
    fn no_sales_branch_distinguishes_out_from_idle() {
        assert_eq!(forecast(0, 0.0), (0, StockoutStatus::Out));
        assert_eq!(forecast(9, 0.0), (NO_SALES_DAYS, StockoutStatus::NoSales));
    }

    #[test]
    fn empty_but_selling_product_is_critical() {
        assert_eq!(forecast(0, 1.5), (0, StockoutStatus::Critical));
    }

    #[test]
    fn predictions_sort_by_urgency_then_days() {
        let idle = product("Idle", 50, 0, 1.0, 2.0);
        let out = product("Out", 0, 0, 1.0, 2.0);
        let slow = product("Slow", 10, 0, 1.0, 2.0); // 14 sold -> 1/day -> 10 days
        let fast = product("Fast", 6, 0, 1.0, 2.0); // 28 sold -> 2/day -> 3 days
        let faster = product("Faster", 2, 0, 1.0, 2.0); // 28 sold -> 2/day -> 1 day
        let sales = vec![sale(&slow, 14, 1), sale(&fast, 28, 1), sale(&faster, 28, 1)];
        let snapshot = InventorySnapshot::new(as_of(), vec![idle, out, slow, fast, faster])
            .with_sales(window_start(as_of(), 14).unwrap(), sales);

        let report = StockoutPredictor::default().run(&snapshot).unwrap();
        let names: Vec<&str> = report.predictions.iter().map(|p| p.name.as_str()).collect();

        assert_eq!(names, vec!["Out", "Faster", "Fast", "Slow", "Idle"]);
        assert_eq!(
            report.summary,
            StockoutSummary {
                critical: 2,
                warning: 0,
                attention: 1,
                out_of_stock: 1
            }
        );
    }

    #[test]
    fn status_serializes_kebab_case() {
        let json = serde_json::to_value(StockoutStatus::NoSales).unwrap();
        assert_eq!(json, "no-sales");
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            /// Property: every product lands in exactly one bucket, consistent with its inputs.
            #[test]
            fn buckets_partition(stock in 0u32..10_000, sold in 0u64..5_000) {
                let avg = sold as f64 / 14.0;
                let (days, status) = forecast(stock, avg);
                let expected = if avg == 0.0 {
                    if stock == 0 { StockoutStatus::Out } else { StockoutStatus::NoSales }
                } else if days <= 3 {
                    StockoutStatus::Critical
                } else if days <= 7 {
                    StockoutStatus::Warning
                } else if days <= 14 {
                    StockoutStatus::Attention
                } else {
                    StockoutStatus::Safe
                };
                prop_assert_eq!(status, expected);
            }
        }
    }
}
