// server/src/web/handlers/payment_handlers.rs

use actix_web::{web, HttpResponse};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, instrument, warn};

use crate::errors::AppError;
use crate::flows::contexts::VerifyPaymentCtx;
use crate::state::AppState;
use medflow::{FlowData, FlowOutcome};

// Field names follow the gateway's client SDK payload verbatim.
#[derive(Debug, Deserialize)]
pub struct VerifyPaymentRequest {
  #[serde(default)]
  pub razorpay_payment_id: Option<String>,
  #[serde(default)]
  pub razorpay_order_id: Option<String>,
  #[serde(default)]
  pub razorpay_signature: Option<String>,
}

/// Driven by the client after the gateway's checkout flow completes. The
/// response always carries a `redirect` screen for the client to branch on.
#[instrument(name = "handler::verify_payment", skip(app_state, payload))]
pub async fn verify_payment_handler(
  app_state: web::Data<AppState>,
  payload: web::Json<VerifyPaymentRequest>,
) -> Result<HttpResponse, AppError> {
  let payload = payload.into_inner();
  let (Some(payment_id), Some(gateway_order_id), Some(signature)) = (
    payload.razorpay_payment_id,
    payload.razorpay_order_id,
    payload.razorpay_signature,
  ) else {
    return Err(AppError::Validation("missing verification fields".to_string()));
  };

  let ctx = VerifyPaymentCtx {
    state: app_state.get_ref().clone(),
    gateway_order_id,
    payment_id,
    signature,
    order_id: None,
    txn_no: None,
    promoted: None,
    details: Vec::new(),
    customer: None,
  };
  let data = FlowData::new(ctx);

  match app_state.flows.verify_payment.run(data.clone()).await {
    Ok(FlowOutcome::Completed) => {
      let guard = data.read();
      info!(order_id = ?guard.order_id, "Payment verified; order confirmed.");
      Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "redirect": "success_screen",
        "message": "Payment verified and order confirmed.",
        "orderId": guard.order_id,
        "txnNo": guard.txn_no,
      })))
    }
    Ok(FlowOutcome::Halted) => {
      warn!("Verify-payment flow halted unexpectedly.");
      Err(AppError::Internal("payment verification workflow was halted".to_string()))
    }
    Err(AppError::PaymentVerification(m)) => {
      warn!(reason = %m, "Payment verification failed; staged order left for investigation.");
      Ok(HttpResponse::Forbidden().json(json!({
        "success": false,
        "redirect": "failed_screen",
        "message": "Payment could not be verified. If money was deducted, it will be refunded in 3-5 business days.",
      })))
    }
    Err(AppError::NotFound(m)) => {
      // Double verification or a stale request: the staging row is gone.
      warn!(reason = %m, "Verification arrived for a pending order that no longer exists.");
      Ok(HttpResponse::NotFound().json(json!({
        "success": false,
        "redirect": "failed_screen",
        "message": m,
      })))
    }
    Err(app_err) => Err(app_err),
  }
}
