//! Server-rendered product page.
//!
//! Shows the shop's product card and wires the buy button to the gateway's
//! checkout widget through the create-order and verify endpoints.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;
use catalog::Product;
use payments::PaymentGateway;

use crate::error::ApiError;
use crate::state::AppState;

const CHECKOUT_SCRIPT_URL: &str = "https://checkout.razorpay.com/v1/checkout.js";

/// GET /: product page.
#[tracing::instrument(skip(state))]
pub async fn index(State(state): State<Arc<AppState>>) -> Result<Html<String>, ApiError> {
    let product = state.store.fetch_any().await?;
    let key_id = state.checkout.gateway().key_id();
    Ok(Html(render_page(product.as_ref(), key_id)))
}

/// Renders the full HTML document.
pub fn render_page(product: Option<&Product>, key_id: &str) -> String {
    let body = match product {
        Some(product) => render_card(product, key_id),
        None => r#"<p class="placeholder">No product available</p>"#.to_string(),
    };

    format!(
        r#"<!doctype html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>Storefront</title>
<style>{STYLE}</style>
</head>
<body>
<div class="app-container">
{body}
</div>
</body>
</html>
"#
    )
}

fn render_card(product: &Product, key_id: &str) -> String {
    let title = escape_html(&product.title);
    let price = &product.price;

    // The gateway only takes whole, positive minor units.
    let checkout = if price.amount.is_zero() {
        r#"<p class="product-free">Free</p>"#.to_string()
    } else if price.amount.fract().is_zero() {
        format!(
            r#"<button id="pay" class="pay-button" data-amount="{amount}" data-currency="{currency}" data-key="{key}" data-name="{title}">Buy now</button>
<p id="payment-status" class="payment-status"></p>
<script src="{CHECKOUT_SCRIPT_URL}"></script>
<script>{CHECKOUT_JS}</script>"#,
            amount = price.amount.trunc(),
            currency = price.currency.code(),
            key = escape_html(key_id),
        )
    } else {
        r#"<p class="payment-status">Online payment unavailable for this price</p>"#.to_string()
    };

    format!(
        r#"<div class="product-card">
<img src="{image}" alt="{title}" class="product-image">
<h2 class="product-title">{title}</h2>
<p class="product-description">{description}</p>
<p class="product-price">{display}</p>
{checkout}
</div>"#,
        image = escape_html(&product.image),
        description = escape_html(&product.description),
        display = escape_html(&price.display()),
    )
}

/// Escapes text for use in HTML bodies and quoted attributes.
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            other => out.push(other),
        }
    }
    out
}

const STYLE: &str = "\
body{font-family:system-ui,sans-serif;background:#f5f5f5;margin:0}\
.app-container{display:flex;justify-content:center;padding:2rem}\
.product-card{background:#fff;border-radius:8px;padding:1.5rem;max-width:360px;box-shadow:0 2px 8px rgba(0,0,0,.1)}\
.product-image{width:100%;border-radius:4px}\
.product-price{font-size:1.25rem;font-weight:600}\
.pay-button{width:100%;padding:.75rem;border:0;border-radius:4px;background:#3399cc;color:#fff;cursor:pointer}";

const CHECKOUT_JS: &str = r#"
(function () {
  var button = document.getElementById('pay');
  var status = document.getElementById('payment-status');
  function post(url, body) {
    return fetch(url, {
      method: 'POST',
      headers: { 'Content-Type': 'application/json' },
      body: JSON.stringify(body)
    }).then(function (res) { return res.json(); });
  }
  button.addEventListener('click', function () {
    var data = button.dataset;
    post('/api/payments/create-order', { amount: Number(data.amount), currency: data.currency })
      .then(function (order) {
        if (!order.orderId) { status.textContent = order.error || 'Could not create order'; return; }
        var checkout = new Razorpay({
          key: order.keyId,
          amount: order.amount,
          currency: order.currency,
          name: data.name,
          order_id: order.orderId,
          handler: function (response) {
            post('/api/payments/verify', response).then(function (result) {
              status.textContent = result.message || result.error;
            });
          }
        });
        checkout.open();
      });
  });
})();
"#;
