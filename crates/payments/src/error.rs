//! Payment error types.

use thiserror::Error;

use crate::order::OrderId;

/// Failures talking to the payment gateway.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure: connection refused, timeout, bad response body.
    #[error("Gateway request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The gateway answered with a non-2xx status.
    #[error("Gateway rejected request with status {status}: {body}")]
    Rejected { status: u16, body: String },

    /// The shared secret cannot be used as an HMAC key.
    #[error("Invalid signing key: {0}")]
    InvalidKey(String),

    /// The gateway is not reachable.
    #[error("Gateway unavailable: {0}")]
    Unavailable(String),
}

/// Errors that can occur during checkout.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// The client payload is missing a field or carries a bad value.
    #[error("Invalid payment request: {field}: {reason}")]
    Validation { field: &'static str, reason: String },

    /// Verification was requested for an order this service did not create,
    /// or whose registration has expired.
    #[error("Unknown order: {0}")]
    UnknownOrder(OrderId),

    /// Gateway error.
    #[error(transparent)]
    Gateway(#[from] GatewayError),
}

impl PaymentError {
    pub(crate) fn validation(field: &'static str, reason: impl Into<String>) -> Self {
        PaymentError::Validation {
            field,
            reason: reason.into(),
        }
    }

    pub(crate) fn required(field: &'static str) -> Self {
        Self::validation(field, format!("`{field}` is required"))
    }
}

/// Convenience type alias for checkout results.
pub type Result<T> = std::result::Result<T, PaymentError>;
