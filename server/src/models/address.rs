// server/src/models/address.rs

use serde::{Deserialize, Serialize};

/// Shipping address as submitted at checkout. Copied by value into order
/// rows; later address-book edits never alter past orders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AddressPayload {
  pub street: String,
  #[serde(default)]
  pub city: Option<String>,
  pub pincode: String,
  #[serde(default)]
  pub house_no: Option<String>,
  #[serde(rename = "type", default)]
  pub kind: Option<String>,
}
