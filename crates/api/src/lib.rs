//! HTTP API and storefront page for the single-product shop.
//!
//! Exposes the product and checkout endpoints under `/api`, a server-rendered
//! product page at `/`, plus health, readiness and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;
pub mod state;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

pub use state::{AppState, create_in_memory_state};

/// Creates the Axum application router with all routes and shared state.
pub fn create_app(state: Arc<AppState>, metrics_handle: PrometheusHandle) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    let api = Router::new()
        .route("/products", post(routes::products::create))
        .route("/products/getitem", get(routes::products::get_item))
        .route("/payments/create-order", post(routes::payments::create_order))
        .route("/payments/verify", post(routes::payments::verify));

    Router::new()
        .route("/", get(routes::storefront::index))
        .route("/health", get(routes::health::check))
        .route("/ready", get(routes::health::ready))
        .nest("/api", api)
        .fallback(routes::not_found)
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}
