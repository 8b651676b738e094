// server/src/services/razorpay.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use hmac::{Hmac, Mac};
use serde::Deserialize;
use serde_json::json;
use sha2::Sha256;
use tracing::{info, instrument};

type HmacSha256 = Hmac<Sha256>;

/// An order created with the external payment provider, distinct from the
/// store's own orders. `amount` is in minor units (paise).
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct GatewayOrder {
  pub id: String,
  pub amount: i64,
  pub currency: String,
}

#[async_trait]
pub trait PaymentGateway: Send + Sync {
  /// Creates a gateway order for the given amount in minor units.
  async fn create_order(&self, amount_minor: i64, receipt: &str) -> AppResult<GatewayOrder>;

  /// Checks the client-supplied signature against the gateway order and
  /// payment ids using the shared secret.
  fn verify_signature(&self, gateway_order_id: &str, payment_id: &str, signature: &str) -> bool;
}

pub struct RazorpayGateway {
  http: reqwest::Client,
  key_id: String,
  key_secret: String,
  api_base: String,
}

impl RazorpayGateway {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      key_id: config.razorpay_key_id.clone(),
      key_secret: config.razorpay_key_secret.clone(),
      api_base: config.razorpay_api_base.clone(),
    }
  }

  /// HMAC-SHA256 over `"<order_id>|<payment_id>"`, hex-encoded — the
  /// signature scheme the gateway's checkout flow hands back to the client.
  fn expected_signature(&self, gateway_order_id: &str, payment_id: &str) -> String {
    let mut mac = HmacSha256::new_from_slice(self.key_secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(gateway_order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    let digest = mac.finalize().into_bytes();
    digest.iter().map(|b| format!("{:02x}", b)).collect()
  }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
  #[instrument(name = "gateway::create_order", skip(self), fields(amount_minor, receipt))]
  async fn create_order(&self, amount_minor: i64, receipt: &str) -> AppResult<GatewayOrder> {
    let url = format!("{}/v1/orders", self.api_base);
    let response = self
      .http
      .post(&url)
      .basic_auth(&self.key_id, Some(&self.key_secret))
      .json(&json!({
        "amount": amount_minor,
        "currency": "INR",
        "receipt": receipt,
        "payment_capture": 1,
      }))
      .send()
      .await
      .map_err(|e| AppError::Gateway(format!("order creation request failed: {}", e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let body = response.text().await.unwrap_or_default();
      return Err(AppError::Gateway(format!(
        "order creation returned {}: {}",
        status, body
      )));
    }

    let order = response
      .json::<GatewayOrder>()
      .await
      .map_err(|e| AppError::Gateway(format!("unreadable order creation response: {}", e)))?;
    info!(gateway_order_id = %order.id, "Gateway order created.");
    Ok(order)
  }

  fn verify_signature(&self, gateway_order_id: &str, payment_id: &str, signature: &str) -> bool {
    self.expected_signature(gateway_order_id, payment_id) == signature
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn gateway() -> RazorpayGateway {
    RazorpayGateway {
      http: reqwest::Client::new(),
      key_id: "rzp_test_key".to_string(),
      key_secret: "rzp_test_secret".to_string(),
      api_base: "https://api.razorpay.example".to_string(),
    }
  }

  #[test]
  fn signature_round_trips_through_verify() {
    let g = gateway();
    let sig = g.expected_signature("order_abc123", "pay_def456");
    assert!(g.verify_signature("order_abc123", "pay_def456", &sig));
  }

  #[test]
  fn tampered_signature_is_rejected() {
    let g = gateway();
    let mut sig = g.expected_signature("order_abc123", "pay_def456");
    // Flip the last hex nibble.
    let last = sig.pop().unwrap();
    sig.push(if last == '0' { '1' } else { '0' });
    assert!(!g.verify_signature("order_abc123", "pay_def456", &sig));
  }

  #[test]
  fn signature_is_bound_to_both_ids() {
    let g = gateway();
    let sig = g.expected_signature("order_abc123", "pay_def456");
    assert!(!g.verify_signature("order_other", "pay_def456", &sig));
    assert!(!g.verify_signature("order_abc123", "pay_other", &sig));
  }

  #[test]
  fn signature_depends_on_the_secret() {
    let g = gateway();
    let other = RazorpayGateway {
      key_secret: "another_secret".to_string(),
      ..gateway()
    };
    let sig = g.expected_signature("order_abc123", "pay_def456");
    assert!(!other.verify_signature("order_abc123", "pay_def456", &sig));
  }
}
