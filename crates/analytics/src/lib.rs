//! `stocksense-analytics`
//!
//! **Responsibility:** decision-support signals derived from product and sales
//! records.
//!
//! Every analysis is an [`Insight`]: a pure function over an
//! [`InventorySnapshot`] fetched once per request. This crate:
//! - performs no IO (callers load the snapshot),
//! - never mutates products or sales,
//! - returns serializable reports with camelCase field names.

pub mod damage;
pub mod dead_stock;
pub mod error;
pub mod financial;
pub mod insight;
pub mod refill;
pub mod snapshot;
pub mod stockout;
pub mod trends;

pub use damage::{DamageReport, DamagedInventory, DamagedItem, ReasonBreakdown};
pub use dead_stock::{DeadStockDetector, DeadStockItem, DeadStockReport};
pub use error::AnalyticsError;
pub use financial::{
    CategoryFinancials, FinancialInsights, FinancialReport, FinancialTotals, ProductFinancials,
};
pub use insight::{Insight, SalesWindow};
pub use refill::{
    RefillAction, RefillAdvice, RefillAdvisor, RefillRecommendation, VelocityPolicy,
};
pub use snapshot::{InventorySnapshot, SalesData};
pub use stockout::{
    StockoutPrediction, StockoutPredictor, StockoutReport, StockoutStatus, StockoutSummary,
};
pub use trends::{
    DailyProductTrend, DailyTotal, DailyTotals, DailyTrends, WeeklyTrend, WeeklyTrends,
};

/// Round to one decimal place (half away from zero).
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
