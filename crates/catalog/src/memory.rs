use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::{CatalogError, NewProduct, Product, ProductId, Result, store::ProductStore};

/// In-memory product store for tests and local runs.
///
/// Products are kept in insertion order, so `fetch_any` always returns the
/// first product created.
#[derive(Clone, Default)]
pub struct InMemoryProductStore {
    products: Arc<RwLock<Vec<Product>>>,
    unavailable: Arc<AtomicBool>,
}

impl InMemoryProductStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored products.
    pub async fn product_count(&self) -> usize {
        self.products.read().await.len()
    }

    /// Removes all products.
    pub async fn clear(&self) {
        self.products.write().await.clear();
    }

    /// Makes every subsequent call fail as if the database were down.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    fn ensure_available(&self) -> Result<()> {
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(CatalogError::Unavailable(
                "in-memory store marked unavailable".to_string(),
            ));
        }
        Ok(())
    }
}

#[async_trait]
impl ProductStore for InMemoryProductStore {
    async fn create(&self, product: NewProduct) -> Result<Product> {
        let validated = product.validate()?;
        self.ensure_available()?;

        let product = validated.into_product(ProductId::new(), Utc::now());
        self.products.write().await.push(product.clone());

        tracing::debug!(product_id = %product.id, "product stored in memory");
        Ok(product)
    }

    async fn fetch_any(&self) -> Result<Option<Product>> {
        self.ensure_available()?;
        Ok(self.products.read().await.first().cloned())
    }

    async fn health_check(&self) -> Result<()> {
        self.ensure_available()
    }
}
