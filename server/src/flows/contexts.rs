// server/src/flows/contexts.rs

//! Context structs carried through the order workflows. Handlers seed the
//! request-derived fields; stages fill in the rest as they run.

use crate::errors::AppError;
use crate::models::{AddressPayload, CartLine, Customer, NewOrder, OrderDetail, PaymentOption, PendingOrder};
use crate::pricing::Quote;
use crate::services::razorpay::GatewayOrder;
use crate::state::AppState;

/// Context for the place-order flow (both the COD and Online branches, and
/// re-orders, which re-run the same flow with cloned fields).
#[derive(Clone)]
pub struct PlaceOrderCtx {
  pub state: AppState,
  pub customer: Customer,

  // Request-derived input.
  pub rx_id: Option<String>,
  pub address: AddressPayload,
  pub patient_name: String,
  pub patient_phone: String,
  pub hospital_name: Option<String>,
  pub doctor_name: Option<String>,
  pub prescription_notes: Option<String>,
  pub payment_option: PaymentOption,
  pub coupon_code: Option<String>,
  pub lines: Vec<CartLine>,
  /// Informational note for re-orders whose original coupon no longer holds.
  pub coupon_note: Option<String>,

  // Populated by the stages.
  pub quote: Option<Quote>,
  pub gateway_order: Option<GatewayOrder>,
  pub order_id: Option<i64>,
  pub pending_order_id: Option<i64>,
  pub txn_no: Option<String>,
}

impl PlaceOrderCtx {
  /// Assembles the insertable order from the priced context.
  pub fn to_new_order(&self) -> Result<NewOrder, AppError> {
    let quote = self
      .quote
      .as_ref()
      .ok_or_else(|| AppError::Internal("order has not been priced yet".to_string()))?;

    Ok(NewOrder {
      customer_id: self.customer.id,
      rx_id: self.rx_id.clone(),
      patient_name: self.patient_name.clone(),
      patient_phone: self.patient_phone.clone(),
      hospital_name: self.hospital_name.clone(),
      doctor_name: self.doctor_name.clone(),
      prescription_notes: self.prescription_notes.clone(),
      street: self.address.street.clone(),
      city: self.address.city.clone(),
      pincode: self.address.pincode.clone(),
      house_no: self.address.house_no.clone(),
      address_type: self.address.kind.clone(),
      subtotal: quote.subtotal,
      coupon_code: self.coupon_code.clone(),
      discount: quote.discount,
      shipping_charge: quote.shipping_charge,
      additional_charge: quote.additional_charge,
      amount: quote.total,
      payment_option: self.payment_option,
    })
  }
}

/// Context for the verify-payment flow: signature check, optimistic claim,
/// promotion, and the post-promotion notifications.
#[derive(Clone)]
pub struct VerifyPaymentCtx {
  pub state: AppState,

  pub gateway_order_id: String,
  pub payment_id: String,
  pub signature: String,

  // Populated by the stages.
  pub order_id: Option<i64>,
  pub txn_no: Option<String>,
  pub promoted: Option<PendingOrder>,
  pub details: Vec<OrderDetail>,
  pub customer: Option<Customer>,
}
