//! Shared application state.

use std::sync::Arc;

use catalog::{InMemoryProductStore, ProductStore};
use payments::{
    CheckoutService, GatewayError, InMemoryPaymentGateway, OrderRegistry, PaymentGateway,
    SignatureVerifier,
};

/// Shared application state accessible from all handlers.
///
/// Built once at startup and handed to the router; nothing here is global.
pub struct AppState {
    pub store: Arc<dyn ProductStore>,
    pub checkout: CheckoutService<Arc<dyn PaymentGateway>>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn ProductStore>,
        gateway: Arc<dyn PaymentGateway>,
        registry: OrderRegistry,
    ) -> Self {
        Self {
            store,
            checkout: CheckoutService::new(gateway, registry),
        }
    }
}

/// State backed entirely by in-memory collaborators.
///
/// Returns the concrete store and gateway too, so callers can seed data,
/// sign payments, or simulate outages.
pub fn create_in_memory_state(
    secret: &str,
) -> Result<(Arc<AppState>, InMemoryProductStore, InMemoryPaymentGateway), GatewayError> {
    let store = InMemoryProductStore::new();
    let gateway = InMemoryPaymentGateway::new(SignatureVerifier::new(secret)?);

    let state = Arc::new(AppState::new(
        Arc::new(store.clone()),
        Arc::new(gateway.clone()),
        OrderRegistry::default(),
    ));

    Ok((state, store, gateway))
}
