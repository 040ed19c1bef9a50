//! Checkout endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use common::Currency;
use payments::{NewOrder, PaymentConfirmation, PaymentGateway};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderResponse {
    pub message: &'static str,
    pub order_id: String,
    pub amount: i64,
    pub currency: Currency,
    pub receipt: Option<String>,
    pub status: String,
    /// Public key the checkout widget is opened with.
    pub key_id: String,
}

#[derive(Serialize)]
pub struct VerifyResponse {
    pub valid: bool,
    pub message: &'static str,
}

/// POST /api/payments/create-order: reserve an order on the gateway.
#[tracing::instrument(skip(state, payload))]
pub async fn create_order(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewOrder>, JsonRejection>,
) -> Result<Json<CreateOrderResponse>, ApiError> {
    let Json(new_order) = payload?;
    let order = state.checkout.create_order(new_order).await?;

    Ok(Json(CreateOrderResponse {
        message: "Order created successfully",
        order_id: order.id.to_string(),
        amount: order.amount,
        currency: order.currency,
        receipt: order.receipt,
        status: order.status,
        key_id: state.checkout.gateway().key_id().to_string(),
    }))
}

/// POST /api/payments/verify: check the signature returned by the widget.
///
/// Both outcomes are 200; only the `valid` flag differs.
#[tracing::instrument(skip(state, payload))]
pub async fn verify(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PaymentConfirmation>, JsonRejection>,
) -> Result<Json<VerifyResponse>, ApiError> {
    let Json(confirmation) = payload?;
    let valid = state.checkout.verify_payment(confirmation).await?;

    let message = if valid {
        "Payment verified successfully"
    } else {
        "Payment verification failed"
    };
    Ok(Json(VerifyResponse { valid, message }))
}
