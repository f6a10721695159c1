use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocksense_core::{DomainError, DomainResult, Entity, ProductId, SaleId};

/// Input for recording a sale. `sold_at` defaults to the time of recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSale {
    pub product_id: ProductId,
    pub quantity: u32,
    #[serde(default)]
    pub sold_at: Option<DateTime<Utc>>,
}

/// A recorded sale.
///
/// `product_id` is a weak reference: deleting the product leaves the sale in
/// place, and readers must tolerate products that no longer exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Sale {
    pub id: SaleId,
    pub product_id: ProductId,
    pub quantity: u32,
    pub sold_at: DateTime<Utc>,
}

impl Entity for Sale {
    type Id = SaleId;

    fn id(&self) -> SaleId {
        self.id
    }
}

impl Sale {
    pub fn record(
        id: SaleId,
        product_id: ProductId,
        quantity: u32,
        sold_at: DateTime<Utc>,
    ) -> DomainResult<Self> {
        if quantity == 0 {
            return Err(DomainError::validation("sale quantity must be positive"));
        }
        Ok(Self {
            id,
            product_id,
            quantity,
            sold_at,
        })
    }

    pub fn from_input(input: NewSale, now: DateTime<Utc>) -> DomainResult<Self> {
        Self::record(
            SaleId::new(),
            input.product_id,
            input.quantity,
            input.sold_at.unwrap_or(now),
        )
    }

    /// True when the sale falls inside a window starting at `since` (inclusive).
    pub fn is_since(&self, since: DateTime<Utc>) -> bool {
        self.sold_at >= since
    }
}
