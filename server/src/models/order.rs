// server/src/models/order.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type as SqlxType};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
pub enum OrderStatus {
  Pending,
  Confirmed,
  Cancelled,
  Shipped,
  Completed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
pub enum PaymentStatus {
  Pending,
  Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, SqlxType)]
pub enum PaymentOption {
  Online,
  #[serde(rename = "COD")]
  #[sqlx(rename = "COD")]
  Cod,
}

/// A confirmed, persisted purchase record. Created once per successful
/// checkout (COD immediately, Online upon payment verification) and never
/// deleted in normal flow.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Order {
  pub id: i64,
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
  pub payment_option: PaymentOption,
  pub payment_status: PaymentStatus,
  pub status: OrderStatus,
  pub txn_no: Option<String>,
  pub gateway_order_id: Option<String>,
  pub gateway_payment_id: Option<String>,
  pub created_at: DateTime<Utc>,
}

/// Field bundle for inserting a new order (or pending order). Assembled by
/// the persist stage from the workflow context.
#[derive(Debug, Clone)]
pub struct NewOrder {
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
  pub payment_option: PaymentOption,
}

impl OrderStatus {
  /// Only fulfilled orders may be repeated.
  pub fn is_reorderable(self) -> bool {
    matches!(self, OrderStatus::Completed | OrderStatus::Shipped)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn completed_and_shipped_orders_are_reorderable() {
    assert!(OrderStatus::Completed.is_reorderable());
    assert!(OrderStatus::Shipped.is_reorderable());
  }

  #[test]
  fn pending_and_cancelled_orders_are_not_reorderable() {
    assert!(!OrderStatus::Pending.is_reorderable());
    assert!(!OrderStatus::Cancelled.is_reorderable());
    assert!(!OrderStatus::Confirmed.is_reorderable());
  }

  #[test]
  fn payment_option_deserializes_client_spelling() {
    let cod: PaymentOption = serde_json::from_str("\"COD\"").unwrap();
    let online: PaymentOption = serde_json::from_str("\"Online\"").unwrap();
    assert_eq!(cod, PaymentOption::Cod);
    assert_eq!(online, PaymentOption::Online);
  }
}
