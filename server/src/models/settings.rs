// server/src/models/settings.rs

use crate::config::AppConfig;
use sqlx::FromRow;

/// Storefront pricing knobs, normally a single row in the settings table.
#[derive(Debug, Clone, FromRow)]
pub struct Settings {
  pub shipping_charge: f64,
  pub shipping_threshold: f64,
  pub cod_fee: f64,
}

impl Settings {
  /// Used when the settings table has no row yet (fresh deployments).
  pub fn fallback(config: &AppConfig) -> Self {
    Self {
      shipping_charge: config.shipping_charge_fallback,
      shipping_threshold: config.shipping_threshold_fallback,
      cod_fee: config.cod_fee_fallback,
    }
  }
}
