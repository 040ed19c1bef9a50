//! Product catalog for the storefront.
//!
//! Holds the single product record the shop sells: its validated shape,
//! the `ProductStore` abstraction, and in-memory and PostgreSQL backends.

pub mod error;
pub mod memory;
pub mod postgres;
pub mod product;
pub mod store;

pub use common::{Currency, ProductId};
pub use error::{CatalogError, Result, ValidationError};
pub use memory::InMemoryProductStore;
pub use postgres::PostgresProductStore;
pub use product::{NewPrice, NewProduct, Price, Product, ValidatedProduct};
pub use store::ProductStore;
