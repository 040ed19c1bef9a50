//! Short-lived record of orders created through this service.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crate::order::{GatewayOrder, OrderId};

/// Default time, in seconds, an order stays verifiable after creation.
pub const DEFAULT_ORDER_TTL_SECS: i64 = 30 * 60;

/// Where a tracked order is in the checkout exchange.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum OrderStatus {
    /// Order reserved on the gateway, payment not yet confirmed.
    #[default]
    Created,
    /// A correctly signed payment was presented for the order.
    Verified,
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OrderStatus::Created => write!(f, "Created"),
            OrderStatus::Verified => write!(f, "Verified"),
        }
    }
}

/// An order this service created, with its registration time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedOrder {
    pub order: GatewayOrder,
    pub status: OrderStatus,
    pub created_at: DateTime<Utc>,
}

impl TrackedOrder {
    fn is_expired(&self, now: DateTime<Utc>, ttl: Duration) -> bool {
        now - self.created_at >= ttl
    }
}

/// In-memory registry of created orders with a time-to-live.
///
/// Entries are dropped lazily on lookup and by `purge_expired`.
#[derive(Debug, Clone)]
pub struct OrderRegistry {
    orders: Arc<RwLock<HashMap<OrderId, TrackedOrder>>>,
    ttl: Duration,
}

impl Default for OrderRegistry {
    fn default() -> Self {
        Self::new(Duration::seconds(DEFAULT_ORDER_TTL_SECS))
    }
}

impl OrderRegistry {
    pub fn new(ttl: Duration) -> Self {
        Self {
            orders: Arc::default(),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Registers a freshly created order.
    pub async fn record(&self, order: GatewayOrder) {
        let tracked = TrackedOrder {
            order,
            status: OrderStatus::Created,
            created_at: Utc::now(),
        };
        self.orders
            .write()
            .await
            .insert(tracked.order.id.clone(), tracked);
    }

    /// Returns the tracked order unless it is unknown or expired.
    pub async fn lookup(&self, order_id: &OrderId) -> Option<TrackedOrder> {
        let now = Utc::now();
        let mut orders = self.orders.write().await;

        let expired = orders.get(order_id)?.is_expired(now, self.ttl);
        if expired {
            orders.remove(order_id);
            tracing::debug!(%order_id, "expired order dropped");
            return None;
        }
        orders.get(order_id).cloned()
    }

    /// Marks an order verified. Returns false if the order is not tracked.
    pub async fn mark_verified(&self, order_id: &OrderId) -> bool {
        match self.orders.write().await.get_mut(order_id) {
            Some(tracked) => {
                tracked.status = OrderStatus::Verified;
                true
            }
            None => false,
        }
    }

    /// Drops every expired entry and returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Utc::now();
        let mut orders = self.orders.write().await;
        let before = orders.len();
        orders.retain(|_, tracked| !tracked.is_expired(now, self.ttl));
        before - orders.len()
    }

    /// Number of tracked orders, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.orders.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.orders.read().await.is_empty()
    }
}
