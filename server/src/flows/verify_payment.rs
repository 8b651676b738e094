// server/src/flows/verify_payment.rs

//! The verify-payment flow: signature check -> optimistic claim -> promotion
//! -> notifications.
//!
//! A signature mismatch is terminal for the attempt and leaves the pending
//! order untouched for support-driven recovery. The claim stage flips the
//! staging row from Pending to Processing with a guarded UPDATE, so a given
//! gateway order is promoted at most once even under concurrent calls; the
//! loser of that race sees "pending order not found".

use crate::db;
use crate::errors::AppError;
use crate::flows::contexts::VerifyPaymentCtx;
use crate::messages;
use medflow::{Flow, FlowControl, FlowData};
use tracing::{info, warn};

pub fn build() -> Flow<VerifyPaymentCtx, AppError> {
  let mut flow = Flow::<VerifyPaymentCtx, AppError>::new(&[
    ("verify_signature", false, None),
    ("claim_pending", false, None),
    ("promote", false, None),
    ("notify", true, None), // fire-and-forget
  ]);

  flow.on("verify_signature", |data: FlowData<VerifyPaymentCtx>| {
    Box::pin(async move {
      let (state, gateway_order_id, payment_id, signature) = {
        let guard = data.read();
        (
          guard.state.clone(),
          guard.gateway_order_id.clone(),
          guard.payment_id.clone(),
          guard.signature.clone(),
        )
      };

      if !state.gateway.verify_signature(&gateway_order_id, &payment_id, &signature) {
        warn!(gateway_order_id = %gateway_order_id, "Payment signature mismatch.");
        return Err(AppError::PaymentVerification(
          "payment signature verification failed".to_string(),
        ));
      }
      info!(gateway_order_id = %gateway_order_id, "Payment signature verified.");
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on("claim_pending", |data: FlowData<VerifyPaymentCtx>| {
    Box::pin(async move {
      let (state, gateway_order_id) = {
        let guard = data.read();
        (guard.state.clone(), guard.gateway_order_id.clone())
      };

      let claimed = db::orders::claim_pending(&state.db_pool, &gateway_order_id).await?;
      if !claimed {
        // Already promoted (double verification) or never staged.
        return Err(AppError::NotFound(format!(
          "pending order not found for gateway order {}",
          gateway_order_id
        )));
      }
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  flow.on("promote", |data: FlowData<VerifyPaymentCtx>| {
    Box::pin(async move {
      let (state, gateway_order_id, payment_id) = {
        let guard = data.read();
        (
          guard.state.clone(),
          guard.gateway_order_id.clone(),
          guard.payment_id.clone(),
        )
      };

      let (order_id, txn_no, promoted) =
        db::orders::promote_pending(&state.db_pool, &gateway_order_id, &payment_id).await?;
      info!(order_id, txn_no = %txn_no, "Pending order promoted to confirmed order.");

      let details = db::orders::details_for_order(&state.db_pool, order_id).await?;
      let customer = db::customers::find_by_id(&state.db_pool, promoted.customer_id).await?;

      {
        let mut guard = data.write();
        guard.order_id = Some(order_id);
        guard.txn_no = Some(txn_no);
        guard.promoted = Some(promoted);
        guard.details = details;
        guard.customer = customer;
      }
      Ok::<_, AppError>(FlowControl::Continue)
    })
  });

  // WhatsApp and email are dispatched independently: either may fail without
  // affecting the other or the HTTP response.
  flow.on("notify", |data: FlowData<VerifyPaymentCtx>| {
    Box::pin(async move {
      let (state, txn_no, promoted, details, customer) = {
        let guard = data.read();
        (
          guard.state.clone(),
          guard.txn_no.clone(),
          guard.promoted.clone(),
          guard.details.clone(),
          guard.customer.clone(),
        )
      };
      let (Some(txn_no), Some(promoted)) = (txn_no, promoted) else {
        warn!("Skipping notifications: promotion context incomplete.");
        return Ok::<_, AppError>(FlowControl::Continue);
      };

      let body = messages::payment_confirmation(&txn_no, promoted.amount);
      if let Err(e) = state.notifier.send(&promoted.patient_phone, &body).await {
        warn!(error = %e, "Order confirmation WhatsApp failed.");
      }

      if let Some(email) = customer.and_then(|c| c.email) {
        let subject = messages::receipt_subject(&txn_no);
        let html = messages::receipt_html(&txn_no, &promoted, &details);
        if let Err(e) = state.mailer.send(&email, &subject, &html).await {
          warn!(error = %e, "Order receipt email failed.");
        }
      }

      Ok(FlowControl::Continue)
    })
  });

  flow
}
