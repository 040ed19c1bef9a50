//! In-memory payment gateway.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;

use crate::error::GatewayError;
use crate::gateway::PaymentGateway;
use crate::order::{GatewayOrder, OrderId, OrderRequest};
use crate::signature::SignatureVerifier;

#[derive(Debug, Default)]
struct InMemoryGatewayState {
    orders: HashMap<OrderId, GatewayOrder>,
    next_id: u32,
    fail_on_create: bool,
}

/// In-memory payment gateway for testing and local runs.
///
/// Issues sequential `order_0001`-style ids and verifies signatures with a
/// local secret, exactly as the real gateway's widget would produce them.
#[derive(Debug, Clone)]
pub struct InMemoryPaymentGateway {
    key_id: String,
    verifier: SignatureVerifier,
    state: Arc<RwLock<InMemoryGatewayState>>,
}

impl InMemoryPaymentGateway {
    /// Key id reported to checkout widgets.
    pub const KEY_ID: &'static str = "rzp_test_inmemory";

    /// Creates a gateway that signs payments with `verifier`.
    pub fn new(verifier: SignatureVerifier) -> Self {
        Self {
            key_id: Self::KEY_ID.to_string(),
            verifier,
            state: Arc::default(),
        }
    }

    /// Makes order creation fail as if the gateway were unreachable.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.write_state().fail_on_create = fail;
    }

    /// Returns the number of orders created so far.
    pub fn order_count(&self) -> usize {
        self.read_state().orders.len()
    }

    /// Returns the stored order, if this gateway created it.
    pub fn order(&self, order_id: &OrderId) -> Option<GatewayOrder> {
        self.read_state().orders.get(order_id).cloned()
    }

    /// Produces the signature the widget would return for a payment.
    pub fn sign_payment(&self, order_id: &OrderId, payment_id: &str) -> String {
        self.verifier.sign(order_id.as_str(), payment_id)
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, InMemoryGatewayState> {
        self.state.read().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, InMemoryGatewayState> {
        self.state
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl PaymentGateway for InMemoryPaymentGateway {
    fn key_id(&self) -> &str {
        &self.key_id
    }

    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let mut state = self.write_state();

        if state.fail_on_create {
            return Err(GatewayError::Unavailable(
                "connection refused".to_string(),
            ));
        }

        state.next_id += 1;
        let order = GatewayOrder {
            id: OrderId::new(format!("order_{:04}", state.next_id)),
            amount: request.amount,
            currency: request.currency,
            receipt: Some(request.receipt),
            status: "created".to_string(),
        };
        state.orders.insert(order.id.clone(), order.clone());

        Ok(order)
    }

    async fn verify(
        &self,
        order_id: &OrderId,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError> {
        Ok(self.verifier.verify(order_id.as_str(), payment_id, signature))
    }
}
