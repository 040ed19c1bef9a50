//! Payment gateway trait.

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::order::{GatewayOrder, OrderId, OrderRequest};

/// Trait for payment gateway operations.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    /// Public key id the checkout widget needs to open a payment.
    fn key_id(&self) -> &str;

    /// Reserves an order for the given amount on the gateway.
    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError>;

    /// Checks a payment signature against the shared secret.
    ///
    /// A mismatch is `Ok(false)`; errors are reserved for failures to
    /// perform the check at all.
    async fn verify(
        &self,
        order_id: &OrderId,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError>;
}

#[async_trait]
impl<T: PaymentGateway + ?Sized> PaymentGateway for Arc<T> {
    fn key_id(&self) -> &str {
        (**self).key_id()
    }

    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError> {
        (**self).create_order(request).await
    }

    async fn verify(
        &self,
        order_id: &OrderId,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError> {
        (**self).verify(order_id, payment_id, signature).await
    }
}
