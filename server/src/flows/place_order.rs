// server/src/flows/place_order.rs

//! The place-order flow: validate -> price -> create_gateway_order (Online
//! only) -> persist -> notify (COD only, fire-and-forget).
//!
//! Validation failures abort before any write; a gateway failure aborts
//! before any persistence; the notify stage is optional so a dead WhatsApp
//! API can never fail an order that is already on disk.

use crate::coupon;
use crate::db;
use crate::errors::AppError;
use crate::flows::contexts::PlaceOrderCtx;
use crate::messages;
use crate::models::{cart, AddressPayload, CartLine, PaymentOption, Settings};
use crate::pricing;
use chrono::Utc;
use medflow::{Flow, FlowControl, FlowData};
use std::sync::Arc;
use tracing::info;

/// Pre-write input checks. Everything here must hold before the workflow
/// touches the database.
pub(crate) fn validate_order_input(
  lines: &[CartLine],
  address: &AddressPayload,
  patient_name: &str,
  patient_phone: &str,
) -> Result<(), AppError> {
  if lines.is_empty() {
    return Err(AppError::Validation("cart must contain at least one item".to_string()));
  }
  if lines.iter().any(|line| line.quantity <= 0) {
    return Err(AppError::Validation(
      "every cart line must have a positive quantity".to_string(),
    ));
  }
  if address.street.trim().is_empty() || address.pincode.trim().is_empty() {
    return Err(AppError::Validation(
      "shipping address must include street and pincode".to_string(),
    ));
  }
  if patient_name.trim().is_empty() {
    return Err(AppError::Validation("patient name is required".to_string()));
  }
  if patient_phone.trim().is_empty() {
    return Err(AppError::Validation("patient phone is required".to_string()));
  }
  Ok(())
}

pub fn build() -> Flow<PlaceOrderCtx, AppError> {
  let mut flow = Flow::<PlaceOrderCtx, AppError>::new(&[
    ("validate", false, None),
    ("price", false, None),
    (
      "create_gateway_order",
      false,
      Some(Arc::new(|data: FlowData<PlaceOrderCtx>| {
        data.read().payment_option == PaymentOption::Cod
      })),
    ),
    ("persist", false, None),
    (
      "notify",
      true, // fire-and-forget
      Some(Arc::new(|data: FlowData<PlaceOrderCtx>| {
        // Online orders are notified after payment verification instead.
        data.read().payment_option == PaymentOption::Online
      })),
    ),
  ]);

  flow.on("validate", |data: FlowData<PlaceOrderCtx>| {
    Box::pin(async move {
      let (lines, address, patient_name, patient_phone) = {
        let guard = data.read();
        (
          guard.lines.clone(),
          guard.address.clone(),
          guard.patient_name.clone(),
          guard.patient_phone.clone(),
        )
      };
      validate_order_input(&lines, &address, &patient_name, &patient_phone)?;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on("price", |data: FlowData<PlaceOrderCtx>| {
    Box::pin(async move {
      let (state, lines, coupon_code, payment_option) = {
        let guard = data.read();
        (
          guard.state.clone(),
          guard.lines.clone(),
          guard.coupon_code.clone(),
          guard.payment_option,
        )
      };

      let settings = db::settings::fetch(&state.db_pool)
        .await?
        .unwrap_or_else(|| Settings::fallback(&state.config));

      let subtotal = cart::subtotal(&lines);
      let discount = match &coupon_code {
        Some(code) => {
          let coupon_row = db::coupons::find_by_code(&state.db_pool, code)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("coupon '{}' not found", code)))?;
          Some(coupon::evaluate(&coupon_row, subtotal, &state.config.coupon_rules())?)
        }
        None => None,
      };

      let quote = pricing::build_quote(subtotal, discount.as_ref(), &settings, payment_option);
      info!(
        subtotal = quote.subtotal,
        discount = quote.discount,
        shipping = quote.shipping_charge,
        additional = quote.additional_charge,
        total = quote.total,
        "Order priced."
      );

      data.write().quote = Some(quote);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on("create_gateway_order", |data: FlowData<PlaceOrderCtx>| {
    Box::pin(async move {
      let (state, customer_id, quote) = {
        let guard = data.read();
        (guard.state.clone(), guard.customer.id, guard.quote)
      };
      let quote = quote.ok_or_else(|| AppError::Internal("quote missing before gateway order creation".to_string()))?;

      let receipt = format!("rcpt-{}-{}", customer_id, Utc::now().timestamp_millis());
      let gateway_order = state
        .gateway
        .create_order(pricing::to_minor_units(quote.total), &receipt)
        .await?;

      data.write().gateway_order = Some(gateway_order);
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on("persist", |data: FlowData<PlaceOrderCtx>| {
    Box::pin(async move {
      let (state, new_order, lines, payment_option, gateway_order_id) = {
        let guard = data.read();
        (
          guard.state.clone(),
          guard.to_new_order()?,
          guard.lines.clone(),
          guard.payment_option,
          guard.gateway_order.as_ref().map(|g| g.id.clone()),
        )
      };

      match payment_option {
        PaymentOption::Cod => {
          let (order_id, txn_no) = db::orders::insert_cod_order(&state.db_pool, &new_order, &lines).await?;
          info!(order_id, txn_no = %txn_no, "COD order persisted.");
          let mut guard = data.write();
          guard.order_id = Some(order_id);
          guard.txn_no = Some(txn_no);
        }
        PaymentOption::Online => {
          let gateway_order_id = gateway_order_id
            .ok_or_else(|| AppError::Internal("gateway order missing for online payment".to_string()))?;
          let pending_id =
            db::orders::insert_pending_order(&state.db_pool, &new_order, &lines, &gateway_order_id).await?;
          info!(pending_id, gateway_order_id = %gateway_order_id, "Pending order staged.");
          data.write().pending_order_id = Some(pending_id);
        }
      }
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on("notify", |data: FlowData<PlaceOrderCtx>| {
    Box::pin(async move {
      let (state, txn_no, patient_name, patient_phone, quote) = {
        let guard = data.read();
        (
          guard.state.clone(),
          guard.txn_no.clone(),
          guard.patient_name.clone(),
          guard.patient_phone.clone(),
          guard.quote,
        )
      };
      let txn_no = txn_no.ok_or_else(|| AppError::Internal("transaction number missing after persist".to_string()))?;
      let quote = quote.ok_or_else(|| AppError::Internal("quote missing after persist".to_string()))?;

      let body = messages::order_summary(&txn_no, &patient_name, quote.total);
      state.notifier.send(&patient_phone, &body).await?;
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow
}

#[cfg(test)]
mod tests {
  use super::*;

  fn address() -> AddressPayload {
    AddressPayload {
      street: "12 MG Road".to_string(),
      city: Some("Pune".to_string()),
      pincode: "411001".to_string(),
      house_no: None,
      kind: Some("Home".to_string()),
    }
  }

  fn line(quantity: i32) -> CartLine {
    CartLine {
      product_id: 1,
      name: "Paracetamol 500mg".to_string(),
      image: None,
      price: 45.5,
      quantity,
      tax: 0.0,
    }
  }

  #[test]
  fn empty_cart_is_rejected() {
    let err = validate_order_input(&[], &address(), "Asha", "9100000000").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn non_positive_quantity_is_rejected() {
    let err = validate_order_input(&[line(0)], &address(), "Asha", "9100000000").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn address_without_pincode_is_rejected() {
    let mut addr = address();
    addr.pincode = "  ".to_string();
    let err = validate_order_input(&[line(1)], &addr, "Asha", "9100000000").unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
  }

  #[test]
  fn missing_patient_details_are_rejected() {
    assert!(validate_order_input(&[line(1)], &address(), "", "9100000000").is_err());
    assert!(validate_order_input(&[line(1)], &address(), "Asha", "").is_err());
  }

  #[test]
  fn well_formed_input_passes() {
    assert!(validate_order_input(&[line(2)], &address(), "Asha", "9100000000").is_ok());
  }
}
