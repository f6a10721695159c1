//! Sales domain module.
//!
//! Sale records are immutable once created; they are only bulk-created or
//! bulk-deleted. `totals` reduces a set of sales to per-product sums.

pub mod sale;
pub mod totals;

pub use sale::{NewSale, Sale};
pub use stocksense_core::SaleId;
pub use totals::{ProductSalesTotal, SalesTotals};
