// server/src/db/prescriptions.rs

use crate::errors::{AppError, Result};
use crate::models::Prescription;
use sqlx::types::Json;
use sqlx::MySqlPool;

pub async fn insert(
  pool: &MySqlPool,
  uuid: &str,
  customer_id: i64,
  order_no: &str,
  image_urls: &[String],
) -> Result<Prescription> {
  let result = sqlx::query(
    "INSERT INTO prescriptions (uuid, customer_id, order_no, images, status) VALUES (?, ?, ?, ?, 'pending')",
  )
  .bind(uuid)
  .bind(customer_id)
  .bind(order_no)
  .bind(Json(image_urls.to_vec()))
  .execute(pool)
  .await?;

  let id = result.last_insert_id() as i64;
  let prescription = sqlx::query_as::<_, Prescription>("SELECT * FROM prescriptions WHERE id = ?")
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| AppError::Internal(format!("prescription {} vanished after insert", id)))?;
  Ok(prescription)
}
