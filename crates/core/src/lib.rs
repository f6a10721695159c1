//! `stocksense-core`: domain foundation building blocks.
//!
//! Identifiers, the entity trait, and the domain error model shared by the
//! product, sales and analytics crates. No infrastructure concerns live here.

pub mod entity;
pub mod error;
pub mod id;

pub use entity::Entity;
pub use error::{DomainError, DomainResult};
pub use id::{ProductId, SaleId};
