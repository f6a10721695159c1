use std::borrow::Cow;

use chrono::{DateTime, Duration, Utc};

use stocksense_products::Product;
use stocksense_sales::{Sale, SalesTotals};

use crate::error::AnalyticsError;
use crate::insight::SalesWindow;

/// Sales material carried by a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub enum SalesData {
    Empty,
    /// Every sale with `sold_at >= since`.
    Records { since: DateTime<Utc>, sales: Vec<Sale> },
    /// Per-product totals of every sale with `sold_at >= since`.
    Totals { since: DateTime<Utc>, totals: SalesTotals },
}

/// Point-in-time view of the stores, materialized once per request.
#[derive(Debug, Clone, PartialEq)]
pub struct InventorySnapshot {
    as_of: DateTime<Utc>,
    products: Vec<Product>,
    sales: SalesData,
}

/// Start of a trailing window of `days` ending at `as_of`.
///
/// Windows reaching past the representable calendar are `InvalidInput`.
pub fn window_start(as_of: DateTime<Utc>, days: u32) -> Result<DateTime<Utc>, AnalyticsError> {
    Duration::try_days(i64::from(days))
        .and_then(|span| as_of.checked_sub_signed(span))
        .ok_or_else(|| {
            AnalyticsError::InvalidInput(format!("window of {days} days is out of range"))
        })
}

impl SalesWindow {
    /// Inclusive lower bound of the window at `as_of`, if sales are needed.
    pub fn since(self, as_of: DateTime<Utc>) -> Result<Option<DateTime<Utc>>, AnalyticsError> {
        match self {
            SalesWindow::None => Ok(None),
            SalesWindow::Records { days } | SalesWindow::Totals { days } => {
                window_start(as_of, days).map(Some)
            }
        }
    }
}

impl InventorySnapshot {
    pub fn new(as_of: DateTime<Utc>, products: Vec<Product>) -> Self {
        Self {
            as_of,
            products,
            sales: SalesData::Empty,
        }
    }

    pub fn with_sales(mut self, since: DateTime<Utc>, sales: Vec<Sale>) -> Self {
        self.sales = SalesData::Records { since, sales };
        self
    }

    pub fn with_totals(mut self, since: DateTime<Utc>, totals: SalesTotals) -> Self {
        self.sales = SalesData::Totals { since, totals };
        self
    }

    pub fn as_of(&self) -> DateTime<Utc> {
        self.as_of
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    /// Sale records with `sold_at >= since`.
    ///
    /// Fails if the snapshot holds only totals, or records starting after `since`.
    pub fn sales_since(
        &self,
        since: DateTime<Utc>,
    ) -> Result<impl Iterator<Item = &Sale>, AnalyticsError> {
        match &self.sales {
            SalesData::Records { since: loaded, sales } if *loaded <= since => {
                Ok(sales.iter().filter(move |s| s.is_since(since)))
            }
            SalesData::Records { since: loaded, .. } => Err(AnalyticsError::MissingSales(
                format!("records start at {loaded}, need {since}"),
            )),
            SalesData::Totals { .. } => Err(AnalyticsError::MissingSales(
                "snapshot holds totals, individual records required".to_string(),
            )),
            SalesData::Empty => Err(AnalyticsError::MissingSales(
                "snapshot holds no sales".to_string(),
            )),
        }
    }

    /// Per-product totals over sales with `sold_at >= since`.
    ///
    /// Uses preloaded totals when their window matches exactly, otherwise
    /// reduces the loaded records.
    pub fn totals_since(&self, since: DateTime<Utc>) -> Result<Cow<'_, SalesTotals>, AnalyticsError> {
        match &self.sales {
            SalesData::Totals { since: loaded, totals } if *loaded == since => {
                Ok(Cow::Borrowed(totals))
            }
            SalesData::Totals { since: loaded, .. } => Err(AnalyticsError::MissingSales(format!(
                "totals cover sales since {loaded}, need {since}"
            ))),
            _ => Ok(Cow::Owned(SalesTotals::from_sales(self.sales_since(since)?))),
        }
    }

    /// Totals over the trailing `days` ending at the snapshot time.
    pub fn totals_within(&self, days: u32) -> Result<Cow<'_, SalesTotals>, AnalyticsError> {
        self.totals_since(window_start(self.as_of, days)?)
    }

    /// Records over the trailing `days` ending at the snapshot time.
    pub fn sales_within(&self, days: u32) -> Result<impl Iterator<Item = &Sale>, AnalyticsError> {
        self.sales_since(window_start(self.as_of, days)?)
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use chrono::{DateTime, Duration, TimeZone, Utc};

    use stocksense_core::{ProductId, SaleId};
    use stocksense_products::{NewProduct, Product};
    use stocksense_sales::Sale;

    pub fn as_of() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
    }

    pub fn product(name: &str, stock: u32, min: u32, cost: f64, price: f64) -> Product {
        product_in(name, "General", stock, min, cost, price)
    }

    pub fn product_in(
        name: &str,
        category: &str,
        stock: u32,
        min: u32,
        cost: f64,
        price: f64,
    ) -> Product {
        Product::create(
            ProductId::new(),
            NewProduct {
                name: name.to_string(),
                sku: format!("SKU-{name}"),
                category: category.to_string(),
                stock_quantity: stock,
                cost_price: cost,
                selling_price: price,
                min_stock_level: min,
            },
            as_of() - Duration::days(90),
        )
        .unwrap()
    }

    pub fn sale(product: &Product, quantity: u32, days_ago: i64) -> Sale {
        Sale::record(
            SaleId::new(),
            product.id,
            quantity,
            as_of() - Duration::days(days_ago),
        )
        .unwrap()
    }
}
