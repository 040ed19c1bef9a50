//! Integration tests for the API server.

use std::sync::Arc;
use std::sync::OnceLock;

use api::AppState;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use catalog::InMemoryProductStore;
use metrics_exporter_prometheus::PrometheusHandle;
use payments::{InMemoryPaymentGateway, OrderId};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

const SECRET: &str = "test_secret";

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

struct TestApp {
    app: axum::Router,
    store: InMemoryProductStore,
    gateway: InMemoryPaymentGateway,
    #[allow(dead_code)]
    state: Arc<AppState>,
}

fn setup() -> TestApp {
    let (state, store, gateway) = api::create_in_memory_state(SECRET).unwrap();
    let app = api::create_app(state.clone(), get_metrics_handle());
    TestApp {
        app,
        store,
        gateway,
        state,
    }
}

fn post_json(uri: &str, body: serde_json::Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(serde_json::to_string(&body).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn send(app: &axum::Router, request: Request<Body>) -> (StatusCode, serde_json::Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let json = if body.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&body).unwrap()
    };
    (status, json)
}

fn mug() -> serde_json::Value {
    serde_json::json!({
        "image": "http://x/i.png",
        "title": "Mug",
        "price": { "amount": 50000, "currency": "INR" },
        "description": "A mug"
    })
}

#[tokio::test]
async fn test_health_check() {
    let t = setup();
    let (status, json) = send(&t.app, get("/health")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_ready_reflects_store_health() {
    let t = setup();
    let (status, json) = send(&t.app, get("/ready")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ready");

    t.store.set_unavailable(true);
    let (status, json) = send(&t.app, get("/ready")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["message"], "Service Unavailable");
}

mod products {
    use super::*;

    #[tokio::test]
    async fn test_create_then_get_item() {
        let t = setup();

        let (status, created) = send(&t.app, post_json("/api/products", mug())).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["message"], "Product created successfully");
        assert_eq!(created["product"]["title"], "Mug");
        assert_eq!(created["product"]["image"], "http://x/i.png");
        assert_eq!(created["product"]["description"], "A mug");
        assert_eq!(created["product"]["price"]["amount"], 50000);
        assert_eq!(created["product"]["price"]["currency"], "INR");
        assert!(created["product"]["id"].as_str().is_some());

        let (status, fetched) = send(&t.app, get("/api/products/getitem")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["message"], "Product fetched successfully");
        assert_eq!(fetched["product"], created["product"]);
    }

    #[tokio::test]
    async fn test_get_item_when_empty_returns_null() {
        let t = setup();
        let (status, json) = send(&t.app, get("/api/products/getitem")).await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["product"].is_null());
    }

    #[tokio::test]
    async fn test_currency_defaults_to_inr() {
        let t = setup();
        let mut body = mug();
        body["price"] = serde_json::json!({ "amount": 100 });

        let (status, json) = send(&t.app, post_json("/api/products", body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(json["product"]["price"]["currency"], "INR");
    }

    #[tokio::test]
    async fn test_fractional_amount_echoed_by_get_item() {
        let t = setup();
        let mut body = mug();
        body["price"]["amount"] = serde_json::json!(12.5);

        let (status, created) = send(&t.app, post_json("/api/products", body)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(created["product"]["price"]["amount"], serde_json::json!(12.5));

        let (status, fetched) = send(&t.app, get("/api/products/getitem")).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(fetched["product"]["price"]["amount"], serde_json::json!(12.5));
        assert_eq!(fetched["product"], created["product"]);
    }

    #[tokio::test]
    async fn test_negative_amount_rejected_and_not_stored() {
        let t = setup();
        let mut body = mug();
        body["price"]["amount"] = serde_json::json!(-5);

        let (status, json) = send(&t.app, post_json("/api/products", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(json["message"], "Validation Error");
        assert!(json["error"].as_str().unwrap().contains("price.amount"));
        assert_eq!(t.store.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_unknown_currency_rejected() {
        let t = setup();
        let mut body = mug();
        body["price"]["currency"] = serde_json::json!("EUR");

        let (status, json) = send(&t.app, post_json("/api/products", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("price.currency"));
        assert_eq!(t.store.product_count().await, 0);
    }

    #[tokio::test]
    async fn test_missing_field_named_in_error() {
        let t = setup();
        let mut body = mug();
        body.as_object_mut().unwrap().remove("description");

        let (status, json) = send(&t.app, post_json("/api/products", body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("description"));
    }

    #[tokio::test]
    async fn test_malformed_json_is_bad_request() {
        let t = setup();
        let request = Request::builder()
            .method("POST")
            .uri("/api/products")
            .header("content-type", "application/json")
            .body(Body::from("{not json"))
            .unwrap();

        let (status, json) = send(&t.app, request).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].is_string());
    }

    #[tokio::test]
    async fn test_store_outage_is_service_unavailable() {
        let t = setup();
        t.store.set_unavailable(true);

        let (status, json) = send(&t.app, get("/api/products/getitem")).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(json["message"], "Service Unavailable");

        let (status, _) = send(&t.app, post_json("/api/products", mug())).await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    }

    #[tokio::test]
    async fn test_second_create_keeps_first_as_item() {
        let t = setup();
        send(&t.app, post_json("/api/products", mug())).await;

        let mut teapot = mug();
        teapot["title"] = serde_json::json!("Teapot");
        let (status, _) = send(&t.app, post_json("/api/products", teapot)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(t.store.product_count().await, 2);

        let (_, fetched) = send(&t.app, get("/api/products/getitem")).await;
        assert_eq!(fetched["product"]["title"], "Mug");
    }
}

mod payments_api {
    use super::*;

    async fn create_order(t: &TestApp) -> serde_json::Value {
        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/create-order",
                serde_json::json!({ "amount": 50000, "currency": "INR" }),
            ),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        json
    }

    #[tokio::test]
    async fn test_create_order() {
        let t = setup();
        let json = create_order(&t).await;

        assert_eq!(json["orderId"], "order_0001");
        assert_eq!(json["amount"], 50000);
        assert_eq!(json["currency"], "INR");
        assert_eq!(json["status"], "created");
        assert_eq!(json["keyId"], InMemoryPaymentGateway::KEY_ID);
        assert!(json["receipt"].as_str().unwrap().starts_with("rcpt_"));
        assert_eq!(t.gateway.order_count(), 1);
    }

    #[tokio::test]
    async fn test_create_order_accepts_whole_float_amount() {
        let t = setup();
        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/create-order",
                serde_json::json!({ "amount": 500.0, "currency": "USD" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["amount"], 500);
        assert_eq!(json["currency"], "USD");
    }

    #[tokio::test]
    async fn test_create_order_rejects_bad_amount() {
        let t = setup();
        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/create-order",
                serde_json::json!({ "amount": 0 }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("amount"));
        assert_eq!(t.gateway.order_count(), 0);
    }

    #[tokio::test]
    async fn test_create_order_with_gateway_down() {
        let t = setup();
        t.gateway.set_fail_on_create(true);

        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/create-order",
                serde_json::json!({ "amount": 50000, "currency": "INR" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert_eq!(json["message"], "Bad Gateway");
        assert!(json.get("orderId").is_none());
    }

    #[tokio::test]
    async fn test_verify_valid_payment() {
        let t = setup();
        let order = create_order(&t).await;
        let order_id = order["orderId"].as_str().unwrap();
        let signature = t.gateway.sign_payment(&OrderId::from(order_id), "pay_1");

        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/verify",
                serde_json::json!({
                    "orderId": order_id,
                    "paymentId": "pay_1",
                    "signature": signature
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["valid"], true);
        assert_eq!(json["message"], "Payment verified successfully");
    }

    #[tokio::test]
    async fn test_verify_accepts_widget_field_names() {
        let t = setup();
        let order = create_order(&t).await;
        let order_id = order["orderId"].as_str().unwrap();
        let signature = t.gateway.sign_payment(&OrderId::from(order_id), "pay_1");

        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/verify",
                serde_json::json!({
                    "razorpay_order_id": order_id,
                    "razorpay_payment_id": "pay_1",
                    "razorpay_signature": signature
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["valid"], true);
    }

    #[tokio::test]
    async fn test_verify_bad_signature_is_ok_but_invalid() {
        let t = setup();
        let order = create_order(&t).await;

        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/verify",
                serde_json::json!({
                    "orderId": order["orderId"],
                    "paymentId": "pay_1",
                    "signature": "0000"
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["valid"], false);
        assert_eq!(json["message"], "Payment verification failed");
    }

    #[tokio::test]
    async fn test_verify_unknown_order_is_not_found() {
        let t = setup();
        let signature = t.gateway.sign_payment(&OrderId::from("order_forged"), "pay_1");

        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/verify",
                serde_json::json!({
                    "orderId": "order_forged",
                    "paymentId": "pay_1",
                    "signature": signature
                }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(json["error"].as_str().unwrap().contains("order_forged"));
    }

    #[tokio::test]
    async fn test_verify_missing_signature() {
        let t = setup();
        let order = create_order(&t).await;

        let (status, json) = send(
            &t.app,
            post_json(
                "/api/payments/verify",
                serde_json::json!({ "orderId": order["orderId"], "paymentId": "pay_1" }),
            ),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(json["error"].as_str().unwrap().contains("signature"));
    }
}

#[tokio::test]
async fn test_storefront_renders_product() {
    let t = setup();
    send(&t.app, post_json("/api/products", mug())).await;

    let response = t.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    assert!(html.contains("Mug"));
    assert!(html.contains("₹500.00"));
    assert!(html.contains(InMemoryPaymentGateway::KEY_ID));
}

#[tokio::test]
async fn test_storefront_free_product_has_no_checkout() {
    let t = setup();
    let mut body = mug();
    body["price"]["amount"] = serde_json::json!(0);
    send(&t.app, post_json("/api/products", body)).await;

    let response = t.app.clone().oneshot(get("/")).await.unwrap();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();

    assert!(html.contains("Free"));
    assert!(!html.contains("Buy now"));
}

#[tokio::test]
async fn test_storefront_without_product() {
    let t = setup();
    let response = t.app.clone().oneshot(get("/")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    assert!(String::from_utf8_lossy(&body).contains("No product available"));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let t = setup();
    let request = Request::builder()
        .uri("/api/products/getitem")
        .header("origin", "http://localhost:5173")
        .body(Body::empty())
        .unwrap();

    let response = t.app.clone().oneshot(request).await.unwrap();
    assert_eq!(
        response
            .headers()
            .get("access-control-allow-origin")
            .unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let t = setup();
    let (status, json) = send(&t.app, get("/api/nope")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Not Found");
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let t = setup();
    send(&t.app, post_json("/api/products", mug())).await;

    let response = t.app.clone().oneshot(get("/metrics")).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("content-type").unwrap(),
        "text/plain; version=0.0.4; charset=utf-8"
    );
}
