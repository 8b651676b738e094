// server/src/state.rs

use crate::config::AppConfig;
use crate::flows::OrderFlows;
use crate::services::email::EmailSender;
use crate::services::imaging::ImageHost;
use crate::services::notify::NotificationSender;
use crate::services::razorpay::PaymentGateway;
use sqlx::MySqlPool;
use std::sync::Arc;

/// Shared application state. Adapters are trait objects so tests can swap in
/// doubles; nothing here is a module-level singleton.
#[derive(Clone)]
pub struct AppState {
  pub db_pool: MySqlPool,
  pub flows: Arc<OrderFlows>,
  pub config: Arc<AppConfig>,
  pub gateway: Arc<dyn PaymentGateway>,
  pub notifier: Arc<dyn NotificationSender>,
  pub mailer: Arc<dyn EmailSender>,
  pub image_host: Arc<dyn ImageHost>,
}
