// server/src/services/notify.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use serde_json::json;
use tracing::{info, instrument};

/// Transactional WhatsApp/SMS messages. Single attempt, no retry; callers
/// treat failures as warnings, never as order failures.
#[async_trait]
pub trait NotificationSender: Send + Sync {
  async fn send(&self, mobile: &str, body: &str) -> AppResult<()>;
  async fn send_template(&self, mobile: &str, template_name: &str) -> AppResult<()>;
}

/// Meta-graph-shaped WhatsApp sender.
pub struct WhatsAppSender {
  http: reqwest::Client,
  token: String,
  phone_number_id: String,
  api_base: String,
}

impl WhatsAppSender {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      token: config.whatsapp_token.clone(),
      phone_number_id: config.whatsapp_phone_number_id.clone(),
      api_base: config.whatsapp_api_base.clone(),
    }
  }

  async fn post_message(&self, body: serde_json::Value) -> AppResult<()> {
    let url = format!("{}/{}/messages", self.api_base, self.phone_number_id);
    let response = self
      .http
      .post(&url)
      .bearer_auth(&self.token)
      .json(&body)
      .send()
      .await
      .map_err(|e| AppError::Internal(format!("notification request failed: {}", e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Internal(format!(
        "notification API returned {}: {}",
        status, detail
      )));
    }
    Ok(())
  }
}

#[async_trait]
impl NotificationSender for WhatsAppSender {
  #[instrument(name = "notify::send", skip(self, body), fields(mobile))]
  async fn send(&self, mobile: &str, body: &str) -> AppResult<()> {
    self
      .post_message(json!({
        "messaging_product": "whatsapp",
        "to": mobile,
        "type": "text",
        "text": { "body": body }
      }))
      .await?;
    info!("WhatsApp text dispatched.");
    Ok(())
  }

  #[instrument(name = "notify::send_template", skip(self), fields(mobile, template_name))]
  async fn send_template(&self, mobile: &str, template_name: &str) -> AppResult<()> {
    self
      .post_message(json!({
        "messaging_product": "whatsapp",
        "to": mobile,
        "type": "template",
        "template": {
          "name": template_name,
          "language": { "code": "en" }
        }
      }))
      .await?;
    info!("WhatsApp template dispatched.");
    Ok(())
  }
}
