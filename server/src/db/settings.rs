// server/src/db/settings.rs

use crate::errors::Result;
use crate::models::Settings;
use sqlx::MySqlPool;

/// The settings table holds at most one row of storefront knobs; callers
/// fall back to `Settings::fallback` when it is empty.
pub async fn fetch(pool: &MySqlPool) -> Result<Option<Settings>> {
  let settings =
    sqlx::query_as::<_, Settings>("SELECT shipping_charge, shipping_threshold, cod_fee FROM settings LIMIT 1")
      .fetch_optional(pool)
      .await?;
  Ok(settings)
}
