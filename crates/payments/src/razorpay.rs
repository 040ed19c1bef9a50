//! Razorpay Orders API client.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::Client;

use crate::error::GatewayError;
use crate::gateway::PaymentGateway;
use crate::order::{GatewayOrder, OrderId, OrderRequest};
use crate::signature::SignatureVerifier;

/// Production API host.
pub const DEFAULT_BASE_URL: &str = "https://api.razorpay.com";

/// Configuration for connecting to Razorpay.
#[derive(Clone)]
pub struct RazorpayConfig {
    /// Public key id, also handed to the checkout widget.
    pub key_id: String,

    /// Key secret, used for basic auth and payment signatures.
    pub key_secret: String,

    /// API host, e.g. `"https://api.razorpay.com"`.
    pub base_url: String,

    /// Per-request timeout.
    pub timeout: Duration,
}

impl RazorpayConfig {
    pub fn new(key_id: impl Into<String>, key_secret: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            key_secret: key_secret.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(10),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl std::fmt::Debug for RazorpayConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RazorpayConfig")
            .field("key_id", &self.key_id)
            .field("key_secret", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// HTTP client for the Razorpay Orders API.
///
/// Orders are created remotely; payment signatures are checked locally
/// with the key secret, as the gateway prescribes.
#[derive(Debug, Clone)]
pub struct RazorpayGateway {
    config: RazorpayConfig,
    http: Client,
    verifier: SignatureVerifier,
}

impl RazorpayGateway {
    /// Create a new client from the given configuration.
    pub fn new(config: RazorpayConfig) -> Result<Self, GatewayError> {
        let http = Client::builder().timeout(config.timeout).build()?;
        let verifier = SignatureVerifier::new(&config.key_secret)?;
        Ok(Self {
            config,
            http,
            verifier,
        })
    }

    fn orders_url(&self) -> String {
        format!("{}/v1/orders", self.config.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    fn key_id(&self) -> &str {
        &self.config.key_id
    }

    #[tracing::instrument(skip(self, request), fields(amount = request.amount, currency = %request.currency))]
    async fn create_order(&self, request: OrderRequest) -> Result<GatewayOrder, GatewayError> {
        let started = Instant::now();

        let result = self
            .http
            .post(self.orders_url())
            .basic_auth(&self.config.key_id, Some(&self.config.key_secret))
            .json(&request)
            .send()
            .await;

        metrics::histogram!("payment_gateway_request_seconds")
            .record(started.elapsed().as_secs_f64());

        let response = result?;
        if !response.status().is_success() {
            let status = response.status();
            let body = match response.text().await {
                Ok(body) => body,
                Err(e) => {
                    tracing::warn!(error = %e, "failed to read gateway error body");
                    format!("<unreadable body: {e}>")
                }
            };
            tracing::warn!(status = status.as_u16(), "gateway rejected order");

            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let order: GatewayOrder = response.json().await?;
        tracing::info!(order_id = %order.id, "gateway order created");
        Ok(order)
    }

    async fn verify(
        &self,
        order_id: &OrderId,
        payment_id: &str,
        signature: &str,
    ) -> Result<bool, GatewayError> {
        Ok(self
            .verifier
            .verify(order_id.as_str(), payment_id, signature))
    }
}
