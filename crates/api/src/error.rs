//! API error types with HTTP response mapping.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use catalog::CatalogError;
use payments::{GatewayError, PaymentError};
use thiserror::Error;

use crate::config::ConfigError;

/// API-level error type that maps to HTTP responses.
///
/// Every error renders as `{"message": <status summary>, "error": <detail>}`.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Product store error.
    Catalog(CatalogError),
    /// Checkout error.
    Payment(PaymentError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, detail) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Catalog(err) => catalog_error_to_response(err),
            ApiError::Payment(err) => payment_error_to_response(err),
            ApiError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %detail, "request failed");
        }

        let body = serde_json::json!({
            "message": summary(status),
            "error": detail,
        });
        (status, axum::Json(body)).into_response()
    }
}

fn summary(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "Validation Error",
        StatusCode::NOT_FOUND => "Not Found",
        StatusCode::BAD_GATEWAY => "Bad Gateway",
        StatusCode::SERVICE_UNAVAILABLE => "Service Unavailable",
        _ => "Internal Server Error",
    }
}

fn catalog_error_to_response(err: CatalogError) -> (StatusCode, String) {
    match &err {
        CatalogError::Validation(_) => (StatusCode::BAD_REQUEST, err.to_string()),
        CatalogError::Unavailable(_) | CatalogError::Database(_) => {
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string())
        }
        CatalogError::Migration(_) | CatalogError::Serialization(_) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
    }
}

fn payment_error_to_response(err: PaymentError) -> (StatusCode, String) {
    match &err {
        PaymentError::Validation { .. } => (StatusCode::BAD_REQUEST, err.to_string()),
        PaymentError::UnknownOrder(_) => (StatusCode::NOT_FOUND, err.to_string()),
        PaymentError::Gateway(GatewayError::InvalidKey(_)) => {
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
        }
        PaymentError::Gateway(_) => (StatusCode::BAD_GATEWAY, err.to_string()),
    }
}

impl From<CatalogError> for ApiError {
    fn from(err: CatalogError) -> Self {
        ApiError::Catalog(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PaymentError> for ApiError {
    fn from(err: PaymentError) -> Self {
        ApiError::Payment(err)
    }
}

/// Failures that stop the server from starting.
#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("product store unavailable: {0}")]
    Store(#[from] CatalogError),

    #[error("payment gateway setup failed: {0}")]
    Gateway(#[from] GatewayError),

    #[error("metrics recorder setup failed: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),

    #[error("server I/O error: {0}")]
    Io(#[from] std::io::Error),
}
