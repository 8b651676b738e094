// server/src/flows/mod.rs

//! The order workflows, expressed as medflow flows. Built once at startup
//! and held in `AppState`; handlers seed a context and run the matching flow.

use crate::errors::AppError;
use medflow::Flow;

pub mod contexts;
pub mod place_order;
pub mod verify_payment;

pub use contexts::{PlaceOrderCtx, VerifyPaymentCtx};

pub struct OrderFlows {
  pub place_order: Flow<PlaceOrderCtx, AppError>,
  pub verify_payment: Flow<VerifyPaymentCtx, AppError>,
}

pub fn build_flows() -> OrderFlows {
  tracing::info!("Building order workflows...");
  let flows = OrderFlows {
    place_order: place_order::build(),
    verify_payment: verify_payment::build(),
  };
  tracing::info!("Order workflows ready.");
  flows
}
