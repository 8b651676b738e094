// server/src/services/imaging.rs

use crate::config::AppConfig;
use crate::errors::{AppError, Result as AppResult};
use async_trait::async_trait;
use serde::Deserialize;
use tracing::{info, instrument};

#[derive(Debug, Clone, Deserialize)]
pub struct UploadedImage {
  pub url: String,
  pub public_id: String,
}

/// Hosts prescription images. Per-file type rejection happens at the host;
/// the server only relays its verdict.
#[async_trait]
pub trait ImageHost: Send + Sync {
  async fn upload(&self, filename: &str, bytes: Vec<u8>) -> AppResult<UploadedImage>;
}

/// Unsigned-preset multipart uploader (Cloudinary-shaped API).
pub struct HostedImageUploader {
  http: reqwest::Client,
  api_base: String,
  upload_preset: String,
}

impl HostedImageUploader {
  pub fn new(config: &AppConfig) -> Self {
    Self {
      http: reqwest::Client::new(),
      api_base: config.image_api_base.clone(),
      upload_preset: config.image_upload_preset.clone(),
    }
  }
}

#[async_trait]
impl ImageHost for HostedImageUploader {
  #[instrument(name = "imaging::upload", skip(self, bytes), fields(filename, size = bytes.len()))]
  async fn upload(&self, filename: &str, bytes: Vec<u8>) -> AppResult<UploadedImage> {
    let url = format!("{}/image/upload", self.api_base);
    let part = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
    let form = reqwest::multipart::Form::new()
      .part("file", part)
      .text("upload_preset", self.upload_preset.clone());

    let response = self
      .http
      .post(&url)
      .multipart(form)
      .send()
      .await
      .map_err(|e| AppError::Internal(format!("image upload request failed: {}", e)))?;

    if !response.status().is_success() {
      let status = response.status();
      let detail = response.text().await.unwrap_or_default();
      return Err(AppError::Validation(format!(
        "image host rejected the file ({}): {}",
        status, detail
      )));
    }

    let uploaded = response
      .json::<UploadedImage>()
      .await
      .map_err(|e| AppError::Internal(format!("unreadable image host response: {}", e)))?;
    info!(public_id = %uploaded.public_id, "Image hosted.");
    Ok(uploaded)
  }
}
