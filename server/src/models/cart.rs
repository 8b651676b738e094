// server/src/models/cart.rs

use serde::{Deserialize, Serialize};

/// One cart line as submitted by the client: a product snapshot plus
/// quantity. Prices are rupees.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
  pub product_id: i64,
  pub name: String,
  #[serde(default)]
  pub image: Option<String>,
  pub price: f64,
  pub quantity: i32,
  #[serde(default)]
  pub tax: f64,
}

impl CartLine {
  pub fn line_total(&self) -> f64 {
    self.price * f64::from(self.quantity) + self.tax
  }
}

/// The cart object of a checkout request. `total_price` is the client's own
/// figure and is accepted for shape compatibility only; money is always
/// recomputed from the lines.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartPayload {
  pub items: Vec<CartLine>,
  #[serde(default)]
  pub total_price: f64,
}

pub fn subtotal(lines: &[CartLine]) -> f64 {
  lines.iter().map(CartLine::line_total).sum()
}
