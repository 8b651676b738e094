// server/src/models/coupon.rs

use serde::Serialize;
use sqlx::FromRow;

/// A coupon row. `discount_type` stays a raw string here; the evaluator is
/// the single place that interprets it (and rejects unknown values).
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Coupon {
  pub id: i64,
  pub code: String,
  pub discount_type: String,
  pub percentage_off: f64,
  pub discount_amount: f64,
  pub max_discount: f64,
  pub min_order_value: f64,
  pub status: String,
}

impl Coupon {
  pub fn is_active(&self) -> bool {
    self.status.eq_ignore_ascii_case("active")
  }
}
