// server/src/web/handlers/coupon_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument};

use crate::coupon;
use crate::db;
use crate::errors::AppError;
use crate::models::CartLine;
use crate::state::AppState;
use crate::web::extractors::AuthenticatedCustomer;

#[derive(Debug, Deserialize)]
pub struct ApplyCouponRequest {
  #[serde(rename = "couponCode")]
  pub coupon_code: String,
  // Accepted for shape compatibility with the client; the preview is priced
  // off totalPrice, and the order flow recomputes everything server-side.
  #[serde(rename = "ProductsFromCart", default)]
  pub products_from_cart: Option<Vec<CartLine>>,
  #[serde(rename = "totalPrice")]
  pub total_price: f64,
}

/// Cart-time coupon preview: pure evaluation over the fetched coupon row.
#[instrument(
    name = "handler::apply_coupon",
    skip(app_state, auth, payload),
    fields(customer_id = %auth.customer.id, coupon_code = %payload.coupon_code)
)]
pub async fn apply_coupon_handler(
  app_state: web::Data<AppState>,
  auth: AuthenticatedCustomer,
  payload: web::Json<ApplyCouponRequest>,
) -> Result<HttpResponse, AppError> {
  tracing::debug!(
    cart_items = payload.products_from_cart.as_ref().map_or(0, Vec::len),
    total_price = payload.total_price,
    "Coupon preview requested."
  );

  let coupon_row = db::coupons::find_by_code(&app_state.db_pool, &payload.coupon_code)
    .await?
    .ok_or_else(|| AppError::NotFound(format!("coupon '{}' not found", payload.coupon_code)))?;

  let discount = coupon::evaluate(&coupon_row, payload.total_price, &app_state.config.coupon_rules())?;
  info!(discount = discount.amount, free_delivery = discount.free_delivery, "Coupon applied.");

  let message = if discount.free_delivery {
    "Coupon applied: delivery is free for this order."
  } else {
    "Coupon applied."
  };

  Ok(HttpResponse::Ok().json(json!({
    "success": true,
    "discount": discount.amount,
    "grandTotal": discount.grand_total(payload.total_price),
    "message": message,
  })))
}
