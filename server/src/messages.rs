// server/src/messages.rs

//! Human-readable notification bodies and the HTML email receipt.

use crate::models::{OrderDetail, PendingOrder};

pub fn order_summary(txn_no: &str, patient_name: &str, amount: f64) -> String {
  format!(
    "Hi {}, your Medikart order {} has been placed. Amount payable on delivery: \u{20B9}{:.2}. \
     We will message you once it ships.",
    patient_name, txn_no, amount
  )
}

pub fn payment_confirmation(txn_no: &str, amount: f64) -> String {
  format!(
    "Payment of \u{20B9}{:.2} received. Your Medikart order {} is confirmed and being prepared.",
    amount, txn_no
  )
}

pub fn receipt_subject(txn_no: &str) -> String {
  format!("Your Medikart order {} is confirmed", txn_no)
}

pub fn receipt_html(txn_no: &str, pending: &PendingOrder, lines: &[OrderDetail]) -> String {
  let mut rows = String::new();
  for line in lines {
    rows.push_str(&format!(
      "<tr><td>{}</td><td>{}</td><td>\u{20B9}{:.2}</td></tr>",
      line.product_name, line.quantity, line.price
    ));
  }

  format!(
    "<h2>Order {} confirmed</h2>\
     <p>Hi {}, thank you for your purchase. Your payment has been received.</p>\
     <table border=\"1\" cellpadding=\"4\">\
     <tr><th>Item</th><th>Qty</th><th>Price</th></tr>{}</table>\
     <p>Subtotal: \u{20B9}{:.2}<br>Discount: \u{20B9}{:.2}<br>Shipping: \u{20B9}{:.2}<br>\
     Additional charges: \u{20B9}{:.2}<br><b>Total paid: \u{20B9}{:.2}</b></p>\
     <p>Delivery to: {}, {}</p>",
    txn_no,
    pending.patient_name,
    rows,
    pending.subtotal,
    pending.discount,
    pending.shipping_charge,
    pending.additional_charge,
    pending.amount,
    pending.street,
    pending.pincode
  )
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::models::pending_order::PendingStatus;
  use chrono::Utc;

  fn pending() -> PendingOrder {
    PendingOrder {
      id: 7,
      gateway_order_id: "order_abc".to_string(),
      customer_id: 3,
      rx_id: None,
      patient_name: "Asha".to_string(),
      patient_phone: "9100000000".to_string(),
      hospital_name: None,
      doctor_name: None,
      prescription_notes: None,
      street: "12 MG Road".to_string(),
      city: Some("Pune".to_string()),
      pincode: "411001".to_string(),
      house_no: None,
      address_type: None,
      subtotal: 1800.0,
      coupon_code: Some("SAVE10".to_string()),
      discount: 180.0,
      shipping_charge: 0.0,
      additional_charge: 0.0,
      amount: 1620.0,
      status: PendingStatus::Pending,
      created_at: Utc::now(),
    }
  }

  fn detail(name: &str, quantity: i32, price: f64) -> OrderDetail {
    OrderDetail {
      id: 1,
      order_id: Some(9),
      pending_order_id: None,
      product_id: 4,
      product_name: name.to_string(),
      product_image: None,
      price,
      quantity,
      tax: 0.0,
    }
  }

  #[test]
  fn order_summary_names_the_transaction_and_amount() {
    let msg = order_summary("PH-42", "Asha", 1680.0);
    assert!(msg.contains("PH-42"));
    assert!(msg.contains("1680.00"));
    assert!(msg.contains("Asha"));
  }

  #[test]
  fn receipt_html_lists_every_line_item_and_the_totals() {
    let lines = vec![detail("Paracetamol 500mg", 2, 45.5), detail("Vitamin D3", 1, 250.0)];
    let html = receipt_html("PH-9", &pending(), &lines);
    assert!(html.contains("Paracetamol 500mg"));
    assert!(html.contains("Vitamin D3"));
    assert!(html.contains("PH-9"));
    assert!(html.contains("1620.00"));
    assert!(html.contains("180.00"));
    assert!(html.contains("12 MG Road"));
  }

  #[test]
  fn payment_confirmation_reads_naturally() {
    let msg = payment_confirmation("PH-9", 1620.0);
    assert!(msg.contains("PH-9"));
    assert!(msg.contains("1620.00"));
  }
}
