use async_trait::async_trait;

use crate::{NewProduct, Product, Result};

/// Core trait for product store implementations.
///
/// The shop sells a single product, so the store only needs to accept new
/// records and hand back the first one. All implementations must be
/// thread-safe (Send + Sync).
#[async_trait]
pub trait ProductStore: Send + Sync {
    /// Validates and persists a product.
    ///
    /// Fails with `CatalogError::Validation` before touching storage when the
    /// payload is invalid, so nothing is written for a rejected payload.
    /// A second call inserts a second record; there is no conflict detection.
    async fn create(&self, product: NewProduct) -> Result<Product>;

    /// Returns the earliest created product, or None when the store is empty.
    async fn fetch_any(&self) -> Result<Option<Product>>;

    /// Cheap round trip proving the store is reachable.
    async fn health_check(&self) -> Result<()>;
}
