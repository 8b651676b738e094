// server/src/services/email.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, instrument};

/// Transactional email. Failures are logged by callers and never affect the
/// HTTP response.
#[async_trait]
pub trait EmailSender: Send + Sync {
  async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()>;
}

/// Brevo-shaped HTTP mail adapter.
pub struct BrevoMailer {
  http: reqwest::Client,
  api_key: String,
  api_base: String,
  sender: String,
}

impl BrevoMailer {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      api_key: config.email_api_key.clone(),
      api_base: config.email_api_base.clone(),
      sender: config.email_sender.clone(),
    }
  }
}

#[async_trait]
impl EmailSender for BrevoMailer {
  #[instrument(name = "email::send", skip(self, html_body), fields(to, subject))]
  async fn send(&self, to: &str, subject: &str, html_body: &str) -> AppResult<()> {
    let url = format!("{}/v3/smtp/email", self.api_base);
    let response = self
      .http
      .post(&url)
      .header("api-key", &self.api_key)
      .json(&json!({
        "sender": { "email": self.sender },
        "to": [{ "email": to }],
        "subject": subject,
        "htmlContent": html_body,
      }))
      .send()
      .await
      .map_err(|e| AppError::Internal(format!("email request failed: {}", e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Internal(format!("email API returned {}: {}", status, detail)));
    }
    info!("Email dispatched.");
    Ok(())
  }
}
