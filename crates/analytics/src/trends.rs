//! Sales trend rollups for charts.

use std::collections::{BTreeMap, HashMap};

use chrono::NaiveDate;
use serde::Serialize;

use stocksense_core::ProductId;

use crate::error::AnalyticsError;
use crate::insight::{Insight, SalesWindow};
use crate::snapshot::InventorySnapshot;

pub const DEFAULT_TREND_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyTrend {
    pub product_id: ProductId,
    /// `None` when the product has since been deleted.
    pub product_name: Option<String>,
    pub total_sold: u64,
}

/// Units sold per product over the window, best sellers first.
#[derive(Debug, Copy, Clone)]
pub struct WeeklyTrends {
    days: u32,
}

impl Default for WeeklyTrends {
    fn default() -> Self {
        Self {
            days: DEFAULT_TREND_DAYS,
        }
    }
}

impl Insight for WeeklyTrends {
    type Output = Vec<WeeklyTrend>;

    fn kind(&self) -> &'static str {
        "trends.weekly"
    }

    fn sales_window(&self) -> SalesWindow {
        SalesWindow::Totals { days: self.days }
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        let names: HashMap<ProductId, &str> = snapshot
            .products()
            .iter()
            .map(|p| (p.id, p.name.as_str()))
            .collect();

        Ok(snapshot
            .totals_within(self.days)?
            .ranked()
            .into_iter()
            .map(|t| WeeklyTrend {
                product_id: t.product_id,
                product_name: names.get(&t.product_id).map(|n| n.to_string()),
                total_sold: t.total_sold,
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyProductTrend {
    pub date: NaiveDate,
    pub product_id: ProductId,
    pub total_sold: u64,
}

/// Units sold per UTC day and product, oldest day first.
#[derive(Debug, Copy, Clone)]
pub struct DailyTrends {
    days: u32,
}

impl Default for DailyTrends {
    fn default() -> Self {
        Self {
            days: DEFAULT_TREND_DAYS,
        }
    }
}

impl Insight for DailyTrends {
    type Output = Vec<DailyProductTrend>;

    fn kind(&self) -> &'static str {
        "trends.daily"
    }

    fn sales_window(&self) -> SalesWindow {
        SalesWindow::Records { days: self.days }
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        let mut grouped: BTreeMap<(NaiveDate, ProductId), u64> = BTreeMap::new();
        for sale in snapshot.sales_within(self.days)? {
            *grouped
                .entry((sale.sold_at.date_naive(), sale.product_id))
                .or_default() += u64::from(sale.quantity);
        }
        Ok(grouped
            .into_iter()
            .map(|((date, product_id), total_sold)| DailyProductTrend {
                date,
                product_id,
                total_sold,
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_sold: u64,
    pub sales_count: u64,
}

/// Units and sale records per UTC day across all products.
#[derive(Debug, Copy, Clone)]
pub struct DailyTotals {
    days: u32,
}

impl Default for DailyTotals {
    fn default() -> Self {
        Self {
            days: DEFAULT_TREND_DAYS,
        }
    }
}

impl Insight for DailyTotals {
    type Output = Vec<DailyTotal>;

    fn kind(&self) -> &'static str {
        "trends.daily_totals"
    }

    fn sales_window(&self) -> SalesWindow {
        SalesWindow::Records { days: self.days }
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        let mut grouped: BTreeMap<NaiveDate, (u64, u64)> = BTreeMap::new();
        for sale in snapshot.sales_within(self.days)? {
            let slot = grouped.entry(sale.sold_at.date_naive()).or_default();
            slot.0 += u64::from(sale.quantity);
            slot.1 += 1;
        }
        Ok(grouped
            .into_iter()
            .map(|(date, (total_sold, sales_count))| DailyTotal {
                date,
                total_sold,
                sales_count,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::snapshot::fixtures::*;
    use crate::snapshot::window_start;

    #[test]
    fn weekly_ranks_best_sellers_and_names_them() {
        let brick = product("Brick", 10, 0, 1.0, 2.0);
        let sand = product("Sand", 10, 0, 1.0, 2.0);
        let gone = product("Gone", 10, 0, 1.0, 2.0);
        let sales = vec![
            sale(&brick, 3, 1),
            sale(&sand, 5, 2),
            sale(&brick, 4, 6),
            sale(&gone, 1, 3),
            sale(&sand, 50, 8),
        ];
        let snapshot = InventorySnapshot::new(as_of(), vec![brick.clone(), sand.clone()])
            .with_sales(window_start(as_of(), 30).unwrap(), sales);

        let trends = WeeklyTrends::default().run(&snapshot).unwrap();

        assert_eq!(trends.len(), 3);
        assert_eq!(trends[0].product_id, brick.id);
        assert_eq!(trends[0].product_name.as_deref(), Some("Brick"));
        assert_eq!(trends[0].total_sold, 7);
        assert_eq!(trends[1].total_sold, 5);
        assert_eq!(trends[2].product_name, None);
    }

    #[test]
    fn daily_groups_by_date_and_product_ascending() {
        let a = product("A", 10, 0, 1.0, 2.0);
        let b = product("B", 10, 0, 1.0, 2.0);
        let sales = vec![
            sale(&a, 2, 1),
            sale(&a, 3, 1),
            sale(&b, 1, 1),
            sale(&a, 4, 5),
        ];
        let snapshot = InventorySnapshot::new(as_of(), vec![a.clone(), b])
            .with_sales(window_start(as_of(), 7).unwrap(), sales);

        let rows = DailyTrends::default().run(&snapshot).unwrap();

        assert_eq!(rows.len(), 3);
        assert!(rows.windows(2).all(|w| w[0].date <= w[1].date));
        assert_eq!(rows[0].total_sold, 4);
        assert_eq!(rows[0].product_id, a.id);
        let day_one: u64 = rows.iter().skip(1).map(|r| r.total_sold).sum();
        assert_eq!(day_one, 6);
    }

    #[test]
    fn daily_totals_count_units_and_records() {
        let a = product("A", 10, 0, 1.0, 2.0);
        let sales = vec![sale(&a, 2, 1), sale(&a, 3, 1), sale(&a, 4, 2)];
        let snapshot = InventorySnapshot::new(as_of(), vec![a])
            .with_sales(window_start(as_of(), 7).unwrap(), sales);

        let rows = DailyTotals::default().run(&snapshot).unwrap();

        assert_eq!(rows.len(), 2);
        assert_eq!((rows[0].total_sold, rows[0].sales_count), (4, 1));
        assert_eq!((rows[1].total_sold, rows[1].sales_count), (5, 2));
    }

    #[test]
    fn daily_trends_need_records() {
        let snapshot = InventorySnapshot::new(as_of(), vec![]);
        let err = DailyTrends::default().run(&snapshot).unwrap_err();
        assert!(matches!(err, AnalyticsError::MissingSales(_)));
    }

    #[test]
    fn dates_serialize_as_iso_days() {
        let a = product("A", 10, 0, 1.0, 2.0);
        let snapshot = InventorySnapshot::new(as_of(), vec![a.clone()])
            .with_sales(window_start(as_of(), 7).unwrap(), vec![sale(&a, 1, 0)]);
        let rows = DailyTotals::default().run(&snapshot).unwrap();
        let json = serde_json::to_value(&rows).unwrap();
        assert_eq!(json[0]["date"], "2025-03-15");
        assert_eq!(json[0]["totalSold"], 1);
    }
}
