pub mod health;
pub mod metrics;
pub mod payments;
pub mod products;
pub mod storefront;

use axum::http::Uri;

use crate::error::ApiError;

/// Fallback for unmatched paths.
pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
