// server/src/models/pending_order.rs

use chrono::{DateTime, Utc};
use sqlx::{FromRow, Type as SqlxType};

/// Lifecycle of a staged online-payment order. `Processing` is the
/// optimistic-concurrency claim taken during promotion; `Abandoned` is
/// written by the sweeper for payments that never completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, SqlxType)]
pub enum PendingStatus {
  Pending,
  Processing,
  Abandoned,
}

/// A staging row created when an online payment is initiated. Promoted into
/// a confirmed order (and deleted) once the gateway signature verifies.
#[derive(Debug, Clone, FromRow)]
pub struct PendingOrder {
  pub id: i64,
  pub gateway_order_id: String,
  pub customer_id: i64,
  pub rx_id: Option<String>,
  pub patient_name: String,
  pub patient_phone: String,
  pub hospital_name: Option<String>,
  pub doctor_name: Option<String>,
  pub prescription_notes: Option<String>,
  pub street: String,
  pub city: Option<String>,
  pub pincode: String,
  pub house_no: Option<String>,
  pub address_type: Option<String>,
  pub subtotal: f64,
  pub coupon_code: Option<String>,
  pub discount: f64,
  pub shipping_charge: f64,
  pub additional_charge: f64,
  pub amount: f64,
  pub status: PendingStatus,
  pub created_at: DateTime<Utc>,
}
