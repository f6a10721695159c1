use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;

use stocksense_core::ProductId;
use stocksense_products::{DamageEntry, Product};

use crate::error::AnalyticsError;
use crate::insight::{Insight, SalesWindow};
use crate::snapshot::InventorySnapshot;

const UNKNOWN_REASON: &str = "Unknown";

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamagedItem {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub damaged_quantity: u32,
    pub damaged_value: f64,
    pub cost_price: f64,
    pub last_reason: String,
    pub last_date: Option<DateTime<Utc>>,
    pub damage_history: Vec<DamageEntry>,
}

impl DamagedItem {
    fn from_product(p: &Product) -> Self {
        let last = p.last_damage();
        Self {
            id: p.id,
            name: p.name.clone(),
            sku: p.sku.clone(),
            category: p.category.clone(),
            damaged_quantity: p.damaged_quantity,
            damaged_value: p.damaged_value(),
            cost_price: p.cost_price,
            last_reason: last
                .map(|d| d.reason.clone())
                .unwrap_or_else(|| UNKNOWN_REASON.to_string()),
            last_date: last.map(|d| d.date),
            damage_history: p.damage_history.clone(),
        }
    }
}

/// Units and cost value attributed to one damage reason.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ReasonBreakdown {
    pub count: u64,
    pub value: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DamageReport {
    pub total_damaged_products: usize,
    pub total_damaged_units: u64,
    pub total_damaged_value: f64,
    pub reason_breakdown: BTreeMap<String, ReasonBreakdown>,
    pub items: Vec<DamagedItem>,
}

/// Products currently holding damaged units.
///
/// The reason breakdown walks every history entry, not just the latest.
#[derive(Debug, Copy, Clone, Default)]
pub struct DamagedInventory;

impl Insight for DamagedInventory {
    type Output = DamageReport;

    fn kind(&self) -> &'static str {
        "damage.report"
    }

    fn sales_window(&self) -> SalesWindow {
        SalesWindow::None
    }

    fn run(&self, snapshot: &InventorySnapshot) -> Result<Self::Output, AnalyticsError> {
        let damaged: Vec<&Product> = snapshot
            .products()
            .iter()
            .filter(|p| p.damaged_quantity > 0)
            .collect();

        let mut reason_breakdown: BTreeMap<String, ReasonBreakdown> = BTreeMap::new();
        for p in &damaged {
            for entry in &p.damage_history {
                let slot = reason_breakdown.entry(entry.reason.clone()).or_default();
                slot.count += u64::from(entry.quantity);
                slot.value += f64::from(entry.quantity) * p.cost_price;
            }
        }

        let items: Vec<DamagedItem> = damaged.iter().map(|p| DamagedItem::from_product(p)).collect();

        Ok(DamageReport {
            total_damaged_products: items.len(),
            total_damaged_units: items.iter().map(|i| u64::from(i.damaged_quantity)).sum(),
            total_damaged_value: items.iter().map(|i| i.damaged_value).sum(),
            reason_breakdown,
            items,
        })
    }
}
