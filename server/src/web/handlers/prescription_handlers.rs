// server/src/web/handlers/prescription_handlers.rs

use actix_multipart::Multipart;
use actix_web::{web, HttpResponse};
use chrono::Utc;
use futures_util::TryStreamExt;
use serde_json::json;
use tracing::{info, instrument, warn};
use uuid::Uuid;

use crate::db;
use crate::errors::AppError;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCustomer;

pub const MAX_PRESCRIPTION_FILES: usize = 5;

/// 1 to 5 images per upload. More than 5 is an explicit rejection, not a
/// silent truncation.
pub(crate) fn ensure_file_budget(incoming_count: usize) -> Result<(), AppError> {
  if incoming_count == 0 {
    return Err(AppError::Validation(
      "at least one prescription image is required".to_string(),
    ));
  }
  if incoming_count > MAX_PRESCRIPTION_FILES {
    return Err(AppError::Validation(format!(
      "at most {} prescription images are accepted per upload",
      MAX_PRESCRIPTION_FILES
    )));
  }
  Ok(())
}

#[instrument(
    name = "handler::upload_prescription",
    skip(app_state, auth, payload),
    fields(customer_id = %auth.customer.id)
)]
pub async fn upload_prescription_handler(
  app_state: web::Data<AppState>,
  auth: AuthenticatedCustomer,
  mut payload: Multipart,
) -> Result<HttpResponse, AppError> {
  let state = app_state.get_ref();

  let mut files: Vec<(String, Vec<u8>)> = Vec::new();
  while let Some(mut field) = payload
    .try_next()
    .await
    .map_err(|e| AppError::Validation(format!("invalid multipart payload: {}", e)))?
  {
    ensure_file_budget(files.len() + 1)?;

    let filename = field
      .content_disposition()
      .and_then(|cd| cd.get_filename())
      .map(str::to_owned)
      .unwrap_or_else(|| format!("prescription-{}", files.len() + 1));

    let mut bytes = Vec::new();
    while let Some(chunk) = field
      .try_next()
      .await
      .map_err(|e| AppError::Validation(format!("failed reading upload: {}", e)))?
    {
      bytes.extend_from_slice(&chunk);
    }
    if bytes.is_empty() {
      continue;
    }
    files.push((filename, bytes));
  }
  ensure_file_budget(files.len())?;

  // Per-file type rejection is the image host's call; its error propagates.
  let mut urls = Vec::with_capacity(files.len());
  for (filename, bytes) in files {
    let uploaded = state.image_host.upload(&filename, bytes).await?;
    urls.push(uploaded.url);
  }

  let uuid = Uuid::new_v4().to_string();
  let order_no = format!("PRC-{}", Utc::now().timestamp_millis());
  let prescription = db::prescriptions::insert(&state.db_pool, &uuid, auth.customer.id, &order_no, &urls).await?;
  info!(uuid = %prescription.uuid, order_no = %prescription.order_no, files = urls.len(), "Prescription stored.");

  // Fire-and-forget: a notification failure never fails the upload.
  if let Err(e) = state.notifier.send_template(&auth.customer.mobile, "prescription_uploaded").await {
    warn!(error = %e, "Prescription-uploaded notification failed.");
  }

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "uuid": prescription.uuid,
    "orderNo": prescription.order_no,
    "files": prescription.images.0,
  })))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn zero_files_are_rejected() {
    assert!(ensure_file_budget(0).is_err());
  }

  #[test]
  fn one_to_five_files_are_accepted() {
    for n in 1..=MAX_PRESCRIPTION_FILES {
      assert!(ensure_file_budget(n).is_ok(), "expected {} files to be accepted", n);
    }
  }

  #[test]
  fn a_sixth_file_is_an_explicit_rejection() {
    let err = ensure_file_budget(MAX_PRESCRIPTION_FILES + 1).unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }
}
