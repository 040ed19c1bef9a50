//! Order and confirmation payloads exchanged with clients and the gateway.

use std::str::FromStr;

use common::Currency;
use common::amount::from_json_number;
use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};
use serde_json::Number;

use crate::error::PaymentError;

/// Gateway-assigned order identifier, e.g. `order_EKwxwAgItmmXdp`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(String);

impl OrderId {
    /// Creates an order ID from a string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the order ID as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for OrderId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for OrderId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Order creation request as sent by a client.
///
/// The amount is read like a product price, so `500.0` and `500` are the same
/// order. The gateway itself only accepts whole minor units.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewOrder {
    pub amount: Option<Number>,
    pub currency: Option<String>,
}

impl NewOrder {
    pub fn new(amount: i64, currency: Currency) -> Self {
        Self {
            amount: Some(Number::from(amount)),
            currency: Some(currency.code().to_string()),
        }
    }

    /// Requires a positive whole amount; currency defaults to INR.
    pub fn validate(self, receipt: impl Into<String>) -> Result<OrderRequest, PaymentError> {
        let amount = self
            .amount
            .ok_or_else(|| PaymentError::required("amount"))
            .and_then(|n| parse_amount(&n))?;

        let currency = match self.currency {
            None => Currency::default(),
            Some(code) => Currency::from_str(&code)
                .map_err(|e| PaymentError::validation("currency", e.to_string()))?,
        };

        Ok(OrderRequest {
            amount,
            currency,
            receipt: receipt.into(),
        })
    }
}

fn parse_amount(n: &Number) -> Result<i64, PaymentError> {
    let out_of_range = || PaymentError::validation("amount", "Amount is out of range");

    let amount = from_json_number(n).ok_or_else(out_of_range)?;
    if amount <= Decimal::ZERO {
        return Err(PaymentError::validation(
            "amount",
            "Amount must be greater than zero",
        ));
    }
    if !amount.fract().is_zero() {
        return Err(PaymentError::validation(
            "amount",
            "Amount must be a whole number of minor currency units",
        ));
    }
    amount.to_i64().ok_or_else(out_of_range)
}

/// Validated order request forwarded to the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrderRequest {
    pub amount: i64,
    pub currency: Currency,
    pub receipt: String,
}

/// Order as reported by the gateway.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayOrder {
    pub id: OrderId,
    pub amount: i64,
    pub currency: Currency,
    #[serde(default)]
    pub receipt: Option<String>,
    pub status: String,
}

/// Payment details returned by the checkout widget.
///
/// Accepts both the camelCase names used by this API and the
/// `razorpay_*` names the widget produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaymentConfirmation {
    #[serde(rename = "orderId", alias = "razorpay_order_id")]
    pub order_id: Option<String>,
    #[serde(rename = "paymentId", alias = "razorpay_payment_id")]
    pub payment_id: Option<String>,
    #[serde(alias = "razorpay_signature")]
    pub signature: Option<String>,
}

impl PaymentConfirmation {
    pub fn new(
        order_id: impl Into<String>,
        payment_id: impl Into<String>,
        signature: impl Into<String>,
    ) -> Self {
        Self {
            order_id: Some(order_id.into()),
            payment_id: Some(payment_id.into()),
            signature: Some(signature.into()),
        }
    }

    /// Returns `(order_id, payment_id, signature)` once all three are present.
    pub fn into_parts(self) -> Result<(OrderId, String, String), PaymentError> {
        let order_id = non_blank("orderId", self.order_id)?;
        let payment_id = non_blank("paymentId", self.payment_id)?;
        let signature = non_blank("signature", self.signature)?;
        Ok((OrderId::new(order_id), payment_id, signature))
    }
}

fn non_blank(field: &'static str, value: Option<String>) -> Result<String, PaymentError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(PaymentError::required(field)),
    }
}
