// server/src/models/prescription.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::types::Json;
use sqlx::FromRow;

/// An uploaded prescription: a UUID, a human-readable order number, and up
/// to five hosted image URLs. Optionally referenced by orders via `rx_id`.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Prescription {
  pub id: i64,
  pub uuid: String,
  pub customer_id: i64,
  pub order_no: String,
  pub images: Json<Vec<String>>,
  pub status: String,
  pub created_at: DateTime<Utc>,
}
