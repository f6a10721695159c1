use serde::Serialize;

use crate::error::AnalyticsError;
use crate::snapshot::InventorySnapshot;

/// Which sales an insight needs loaded into its snapshot.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SalesWindow {
    /// Products only.
    None,
    /// Individual sale records from the trailing `days`.
    Records { days: u32 },
    /// Per-product totals over the trailing `days`.
    Totals { days: u32 },
}

/// An analysis over a snapshot of the stores.
///
/// Loaders call [`Insight::sales_window`] to decide what to fetch, build an
/// [`InventorySnapshot`], then call [`Insight::run`]. Must not mutate anything.
pub trait Insight: Send + Sync {
    type Output: Serialize + Send;

    /// Stable name used in logs.
    fn kind(&self) -> &'static str;

    fn sales_window(&self) -> SalesWindow;

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError>;
}
