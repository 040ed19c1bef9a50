//! Product endpoints.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use catalog::{NewProduct, Product};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Serialize)]
pub struct ProductResponse {
    pub message: &'static str,
    pub product: Option<Product>,
}

/// POST /api/products: validate and store a product.
#[tracing::instrument(skip(state, payload))]
pub async fn create(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<NewProduct>, JsonRejection>,
) -> Result<(StatusCode, Json<ProductResponse>), ApiError> {
    let Json(new_product) = payload?;

    let product = match state.store.create(new_product).await {
        Ok(product) => product,
        Err(e) => {
            if e.is_validation() {
                metrics::counter!("product_validation_failures_total").increment(1);
                tracing::info!(error = %e, "product rejected");
            }
            return Err(e.into());
        }
    };

    metrics::counter!("products_created_total").increment(1);
    tracing::info!(product_id = %product.id, title = %product.title, "product created");

    Ok((
        StatusCode::CREATED,
        Json(ProductResponse {
            message: "Product created successfully",
            product: Some(product),
        }),
    ))
}

/// GET /api/products/getitem: the first product, or null when none exist.
#[tracing::instrument(skip(state))]
pub async fn get_item(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ProductResponse>, ApiError> {
    let product = state.store.fetch_any().await?;

    Ok(Json(ProductResponse {
        message: "Product fetched successfully",
        product,
    }))
}
