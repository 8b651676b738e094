// server/src/web/handlers/order_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::coupon;
use crate::db;
use crate::errors::AppError;
use crate::flows::contexts::PlaceOrderCtx;
use crate::models::{cart, AddressPayload, CartLine, CartPayload, Customer, Order, PaymentOption};
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCustomer;
use medflow::{FlowData, FlowOutcome};

// --- Request DTO ---
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MakeOrderRequest {
  #[serde(rename = "Rx_id", default)]
  pub rx_id: Option<String>,
  pub address: AddressPayload,
  pub patient_name: String,
  pub patient_phone: String,
  #[serde(default)]
  pub hospital_name: Option<String>,
  #[serde(default)]
  pub doctor_name: Option<String>,
  #[serde(default)]
  pub prescription_notes: Option<String>,
  pub payment_option: PaymentOption,
  #[serde(default)]
  pub coupon_code: Option<String>,
  pub cart: CartPayload,
}

fn seed_ctx(state: &AppState, customer: Customer, req: MakeOrderRequest, coupon_note: Option<String>) -> PlaceOrderCtx {
  PlaceOrderCtx {
    state: state.clone(),
    customer,
    rx_id: req.rx_id,
    address: req.address,
    patient_name: req.patient_name,
    patient_phone: req.patient_phone,
    hospital_name: req.hospital_name,
    doctor_name: req.doctor_name,
    prescription_notes: req.prescription_notes,
    payment_option: req.payment_option,
    coupon_code: req.coupon_code,
    lines: req.cart.items,
    coupon_note,
    quote: None,
    gateway_order: None,
    order_id: None,
    pending_order_id: None,
    txn_no: None,
  }
}

/// Runs the place-order flow and shapes the COD/Online response.
async fn run_place_order(state: &AppState, ctx: PlaceOrderCtx) -> Result<HttpResponse, AppError> {
  let coupon_note = ctx.coupon_note.clone();
  let data = FlowData::new(ctx);

  match state.flows.place_order.run(data.clone()).await {
    Ok(FlowOutcome::Completed) => {
      let guard = data.read();
      let mut body = match guard.payment_option {
        PaymentOption::Cod => {
          let order_id = guard
            .order_id
            .ok_or_else(|| AppError::Internal("order placed but its id is unavailable".to_string()))?;
          info!(order_id, "COD order placed.");
          json!({
            "message": "Order placed successfully.",
            "orderId": order_id,
            "orderPlaced": true,
          })
        }
        PaymentOption::Online => {
          let gateway_order = guard
            .gateway_order
            .clone()
            .ok_or_else(|| AppError::Internal("online order staged but gateway order is unavailable".to_string()))?;
          info!(
            pending_order_id = ?guard.pending_order_id,
            gateway_order_id = %gateway_order.id,
            "Online order staged; awaiting payment."
          );
          json!({
            "message": "Order initiated. Complete the payment to confirm.",
            "sendOrder": gateway_order,
          })
        }
      };
      if let Some(note) = coupon_note {
        body["couponMessage"] = json!(note);
      }
      Ok(HttpResponse::Ok().json(body))
    }
    Ok(FlowOutcome::Halted) => {
      warn!("Place-order flow halted unexpectedly.");
      Err(AppError::Internal("order workflow was halted".to_string()))
    }
    Err(app_err) => {
      warn!(error = %app_err, "Place-order flow failed.");
      Err(app_err)
    }
  }
}

// --- Handler Implementations ---

#[instrument(
    name = "handler::make_a_order",
    skip(app_state, auth, payload),
    fields(customer_id = %auth.customer.id, payment_option = ?payload.payment_option)
)]
pub async fn make_a_order_handler(
  app_state: web::Data<AppState>,
  auth: AuthenticatedCustomer,
  payload: web::Json<MakeOrderRequest>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();

  // The client's own total is informational only; money is recomputed from
  // the lines. A mismatch usually means a stale client-side cart.
  let claimed = payload.cart.total_price;
  let recomputed = cart::subtotal(&payload.cart.items);
  if claimed > 0.0 && (claimed - recomputed).abs() > 0.01 {
    warn!(claimed, recomputed, "Client cart total disagrees with line items.");
  }

  let ctx = seed_ctx(app_state.get_ref(), auth.customer, payload, None);
  run_place_order(app_state.get_ref(), ctx).await
}

/// Clones a previous order's shipping/product/pricing fields into a fresh
/// run of the place-order flow. An expired coupon downgrades to an
/// informational note instead of blocking the order.
#[instrument(
    name = "handler::repeat_order",
    skip(app_state, auth),
    fields(customer_id = %auth.customer.id, original_order_id = %path)
)]
pub async fn repeat_order_handler(
  app_state: web::Data<AppState>,
  auth: AuthenticatedCustomer,
  path: web::Path<i64>,
) -> Result<HttpResponse, AppError> {
  let original_order_id = path.into_inner();
  let state = app_state.get_ref();

  let original = db::orders::find_for_customer(&state.db_pool, original_order_id, auth.customer.id)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("order {} not found", original_order_id)))?;

  if !original.status.is_reorderable() {
    return Err(AppError::NotReorderable(format!(
      "orders with status {:?} cannot be repeated",
      original.status
    )));
  }

  let details = db::orders::details_for_order(&state.db_pool, original.id).await?;
  let lines: Vec<CartLine> = details
    .iter()
    .map(|d| CartLine {
      product_id: d.product_id,
      name: d.product_name.clone(),
      image: d.product_image.clone(),
      price: d.price,
      quantity: d.quantity,
      tax: d.tax,
    })
    .collect();

  let (coupon_code, coupon_note) = revalidate_coupon(state, &original, &lines).await?;

  let ctx = PlaceOrderCtx {
    state: state.clone(),
    customer: auth.customer,
    rx_id: original.rx_id.clone(),
    address: AddressPayload {
      street: original.street.clone(),
      city: original.city.clone(),
      pincode: original.pincode.clone(),
      house_no: original.house_no.clone(),
      kind: original.address_type.clone(),
    },
    patient_name: original.patient_name.clone(),
    patient_phone: original.patient_phone.clone(),
    hospital_name: original.hospital_name.clone(),
    doctor_name: original.doctor_name.clone(),
    prescription_notes: original.prescription_notes.clone(),
    payment_option: original.payment_option,
    coupon_code,
    lines,
    coupon_note,
    quote: None,
    gateway_order: None,
    order_id: None,
    pending_order_id: None,
    txn_no: None,
  };

  run_place_order(state, ctx).await
}

/// Checks whether the original order's coupon still evaluates against the
/// cloned cart. A failed check is informational, never an error.
async fn revalidate_coupon(
  state: &AppState,
  original: &Order,
  lines: &[CartLine],
) -> Result<(Option<String>, Option<String>), AppError> {
  let Some(code) = &original.coupon_code else {
    return Ok((None, None));
  };

  let subtotal = cart::subtotal(lines);
  let still_valid = match db::coupons::find_by_code(&state.db_pool, code).await? {
    Some(coupon_row) => coupon::evaluate(&coupon_row, subtotal, &state.config.coupon_rules()).is_ok(),
    None => false,
  };

  if still_valid {
    Ok((Some(code.clone()), None))
  } else {
    info!(coupon_code = %code, "Original coupon no longer valid; repeating order without discount.");
    Ok((
      None,
      Some("Coupon was invalid or expired; order placed without the discount.".to_string()),
    ))
  }
}
