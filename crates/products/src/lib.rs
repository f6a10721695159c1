//! Products domain module.
//!
//! The product record and its state transitions (stock updates, damage,
//! write-off), implemented as deterministic domain logic with no IO.

pub mod product;

pub use product::{DamageEntry, NewProduct, Product, ProductPatch};
pub use stocksense_core::ProductId;
