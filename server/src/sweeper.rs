// server/src/sweeper.rs

//! Background sweep for abandoned online payments: pending orders older than
//! the configured TTL are marked `Abandoned` so support queries don't wade
//! through stale staging rows.

use crate::db;
use crate::state::AppState;
use std::time::Duration;
use tracing::{error, warn};

const SWEEP_INTERVAL: Duration = Duration::from_secs(60 * 60);

pub fn spawn(state: AppState) {
  tokio::spawn(async move {
    let mut tick = tokio::time::interval(SWEEP_INTERVAL);
    loop {
      tick.tick().await;
      match db::orders::mark_abandoned(&state.db_pool, state.config.pending_ttl_hours).await {
        Ok(0) => {}
        Ok(swept) => warn!(swept, "Marked stale pending orders as Abandoned."),
        Err(e) => error!(error = %e, "Pending-order sweep failed."),
      }
    }
  });
}
