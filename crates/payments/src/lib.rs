//! Payment gateway integration for the storefront.
//!
//! Checkout is a two step exchange with the gateway:
//! 1. Create an order for an amount and currency
//! 2. Verify the signature the gateway's widget returns after payment
//!
//! Orders live on the gateway. This crate only remembers the ids it created
//! for a limited time, so that verification can refuse orders it never issued.

pub mod error;
pub mod gateway;
pub mod memory;
pub mod order;
pub mod razorpay;
pub mod registry;
pub mod service;
pub mod signature;

pub use common::Currency;
pub use error::{GatewayError, PaymentError, Result};
pub use gateway::PaymentGateway;
pub use memory::InMemoryPaymentGateway;
pub use order::{GatewayOrder, NewOrder, OrderId, OrderRequest, PaymentConfirmation};
pub use razorpay::{RazorpayConfig, RazorpayGateway};
pub use registry::{OrderRegistry, OrderStatus, TrackedOrder};
pub use service::CheckoutService;
pub use signature::SignatureVerifier;
