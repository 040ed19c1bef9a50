//! Value types shared by the catalog, payments, and API crates.

pub mod amount;
pub mod types;

pub use rust_decimal::Decimal;
pub use types::{Currency, ProductId, UnsupportedCurrency};
