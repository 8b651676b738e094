// server/src/models/order_detail.rs

use serde::Serialize;
use sqlx::FromRow;

/// One row per cart line, snapshotting product name/image/price at order
/// time so later product edits don't alter historical orders. Attached to
/// either a confirmed order or a pending order, never both.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct OrderDetail {
  pub id: i64,
  pub order_id: Option<i64>,
  pub pending_order_id: Option<i64>,
  pub product_id: i64,
  pub product_name: String,
  pub product_image: Option<String>,
  pub price: f64,
  pub quantity: i32,
  pub tax: f64,
}
