use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use stocksense_core::{DomainError, DomainResult, Entity, ProductId};

/// One damage event in a product's history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEntry {
    pub quantity: u32,
    pub reason: String,
    pub date: DateTime<Utc>,
}

/// Input for creating a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub sku: String,
    pub category: String,
    #[serde(default)]
    pub stock_quantity: u32,
    pub cost_price: f64,
    pub selling_price: f64,
    #[serde(default)]
    pub min_stock_level: u32,
}

/// Partial update of catalog fields. `None` leaves a field untouched.
///
/// Stock and damage counters are not patchable; they move through
/// [`Product::set_stock`], [`Product::mark_damaged`] and
/// [`Product::write_off_damaged`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    pub name: Option<String>,
    pub sku: Option<String>,
    pub category: Option<String>,
    pub cost_price: Option<f64>,
    pub selling_price: Option<f64>,
    pub min_stock_level: Option<u32>,
}

/// A stocked product.
///
/// `stock_quantity` and `damaged_quantity` are independent counters. Damage
/// moves units from the first to the second in a single transition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub sku: String,
    pub category: String,
    pub stock_quantity: u32,
    pub cost_price: f64,
    pub selling_price: f64,
    pub min_stock_level: u32,
    #[serde(default)]
    pub damaged_quantity: u32,
    #[serde(default)]
    pub damage_history: Vec<DamageEntry>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entity for Product {
    type Id = ProductId;

    fn id(&self) -> ProductId {
        self.id
    }
}

impl Product {
    /// Build a new product from validated input.
    pub fn create(id: ProductId, input: NewProduct, now: DateTime<Utc>) -> DomainResult<Self> {
        ensure_text("name", &input.name)?;
        ensure_text("sku", &input.sku)?;
        ensure_text("category", &input.category)?;
        ensure_price("costPrice", input.cost_price)?;
        ensure_price("sellingPrice", input.selling_price)?;

        Ok(Self {
            id,
            name: input.name.trim().to_string(),
            sku: input.sku.trim().to_string(),
            category: input.category.trim().to_string(),
            stock_quantity: input.stock_quantity,
            cost_price: input.cost_price,
            selling_price: input.selling_price,
            min_stock_level: input.min_stock_level,
            damaged_quantity: 0,
            damage_history: Vec::new(),
            created_at: now,
            updated_at: now,
        })
    }

    /// Apply a partial update. Validation happens before any field changes.
    pub fn apply_patch(&mut self, patch: ProductPatch, now: DateTime<Utc>) -> DomainResult<()> {
        if let Some(name) = &patch.name {
            ensure_text("name", name)?;
        }
        if let Some(sku) = &patch.sku {
            ensure_text("sku", sku)?;
        }
        if let Some(category) = &patch.category {
            ensure_text("category", category)?;
        }
        if let Some(cost) = patch.cost_price {
            ensure_price("costPrice", cost)?;
        }
        if let Some(price) = patch.selling_price {
            ensure_price("sellingPrice", price)?;
        }

        if let Some(name) = patch.name {
            self.name = name.trim().to_string();
        }
        if let Some(sku) = patch.sku {
            self.sku = sku.trim().to_string();
        }
        if let Some(category) = patch.category {
            self.category = category.trim().to_string();
        }
        if let Some(cost) = patch.cost_price {
            self.cost_price = cost;
        }
        if let Some(price) = patch.selling_price {
            self.selling_price = price;
        }
        if let Some(min) = patch.min_stock_level {
            self.min_stock_level = min;
        }
        self.updated_at = now;
        Ok(())
    }

    /// Overwrite the on-hand quantity. Negative values are rejected.
    pub fn set_stock(&mut self, quantity: i64, now: DateTime<Utc>) -> DomainResult<()> {
        let quantity = u32::try_from(quantity)
            .map_err(|_| DomainError::validation("valid stockQuantity is required"))?;
        self.stock_quantity = quantity;
        self.updated_at = now;
        Ok(())
    }

    /// Move `quantity` units from stock to damaged and record why.
    ///
    /// On error nothing changes.
    pub fn mark_damaged(
        &mut self,
        quantity: u32,
        reason: &str,
        now: DateTime<Utc>,
    ) -> DomainResult<()> {
        if quantity == 0 {
            return Err(DomainError::validation("damaged quantity must be positive"));
        }
        let reason = reason.trim();
        if reason.is_empty() {
            return Err(DomainError::validation("damage reason cannot be empty"));
        }
        if quantity > self.stock_quantity {
            return Err(DomainError::InsufficientStock {
                requested: quantity,
                available: self.stock_quantity,
            });
        }
        let damaged = self
            .damaged_quantity
            .checked_add(quantity)
            .ok_or_else(|| DomainError::validation("damaged quantity overflow"))?;

        self.stock_quantity -= quantity;
        self.damaged_quantity = damaged;
        self.damage_history.push(DamageEntry {
            quantity,
            reason: reason.to_string(),
            date: now,
        });
        self.updated_at = now;
        Ok(())
    }

    /// Drop all damaged units and their history. Returns how many were written off.
    pub fn write_off_damaged(&mut self, now: DateTime<Utc>) -> u32 {
        let written_off = self.damaged_quantity;
        self.damaged_quantity = 0;
        self.damage_history.clear();
        self.updated_at = now;
        written_off
    }

    /// Most recent damage event, if any.
    pub fn last_damage(&self) -> Option<&DamageEntry> {
        self.damage_history.last()
    }

    /// Capital tied up in on-hand stock (quantity × cost).
    pub fn stock_value(&self) -> f64 {
        f64::from(self.stock_quantity) * self.cost_price
    }

    pub fn damaged_value(&self) -> f64 {
        f64::from(self.damaged_quantity) * self.cost_price
    }
}

fn ensure_text(field: &str, value: &str) -> DomainResult<()> {
    if value.trim().is_empty() {
        return Err(DomainError::validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn ensure_price(field: &str, value: f64) -> DomainResult<()> {
    if !value.is_finite() || value < 0.0 {
        return Err(DomainError::validation(format!(
            "{field} must be a finite, non-negative number"
        )));
    }
    Ok(())
}
