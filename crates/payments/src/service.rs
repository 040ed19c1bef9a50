//! Checkout service tying the gateway to the order registry.

use uuid::Uuid;

use crate::error::{PaymentError, Result};
use crate::gateway::PaymentGateway;
use crate::order::{GatewayOrder, NewOrder, PaymentConfirmation};
use crate::registry::OrderRegistry;

/// Drives the two checkout steps: create an order, then verify the payment.
///
/// Verification is only attempted for orders this service created and
/// whose registration has not expired.
#[derive(Debug, Clone)]
pub struct CheckoutService<G: PaymentGateway> {
    gateway: G,
    registry: OrderRegistry,
}

impl<G: PaymentGateway> CheckoutService<G> {
    /// Creates a checkout service with the given gateway and registry.
    pub fn new(gateway: G, registry: OrderRegistry) -> Self {
        Self { gateway, registry }
    }

    /// Returns a reference to the underlying gateway.
    pub fn gateway(&self) -> &G {
        &self.gateway
    }

    /// Returns a reference to the order registry.
    pub fn registry(&self) -> &OrderRegistry {
        &self.registry
    }

    /// Validates the request, creates the order on the gateway and tracks it.
    #[tracing::instrument(skip(self))]
    pub async fn create_order(&self, new_order: NewOrder) -> Result<GatewayOrder> {
        let request = new_order.validate(format!("rcpt_{}", Uuid::new_v4().simple()))?;

        let order = match self.gateway.create_order(request).await {
            Ok(order) => order,
            Err(e) => {
                metrics::counter!("payment_order_failures_total").increment(1);
                tracing::error!(error = %e, "order creation failed");
                return Err(PaymentError::Gateway(e));
            }
        };

        self.registry.record(order.clone()).await;
        metrics::counter!("payment_orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, amount = order.amount, "order created");

        Ok(order)
    }

    /// Checks a payment signature for a previously created order.
    ///
    /// A signature mismatch is `Ok(false)`. An order id that was never
    /// created here, or has expired, is `PaymentError::UnknownOrder`.
    #[tracing::instrument(skip(self, confirmation))]
    pub async fn verify_payment(&self, confirmation: PaymentConfirmation) -> Result<bool> {
        let (order_id, payment_id, signature) = confirmation.into_parts()?;

        if self.registry.lookup(&order_id).await.is_none() {
            metrics::counter!("payment_verifications_total", "outcome" => "unknown_order")
                .increment(1);
            tracing::warn!(%order_id, "verification for unknown order");
            return Err(PaymentError::UnknownOrder(order_id));
        }

        let valid = self
            .gateway
            .verify(&order_id, &payment_id, &signature)
            .await?;

        if valid {
            self.registry.mark_verified(&order_id).await;
        }

        let outcome = if valid { "valid" } else { "invalid" };
        metrics::counter!("payment_verifications_total", "outcome" => outcome).increment(1);
        tracing::info!(%order_id, %payment_id, valid, "payment verified");

        Ok(valid)
    }
}
