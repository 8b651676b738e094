// src/error.rs

use anyhow::Error as AnyhowError;
use thiserror::Error;

/// Framework-level failures. Application error types used with `Flow` must
/// implement `From<FlowError>` so the engine can surface these through the
/// flow's own error channel.
#[derive(Debug, Error)]
pub enum FlowError {
  #[error("handler missing for non-optional stage: {stage}")]
  MissingHandler { stage: String },

  #[error("error in user-provided handler or external operation: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },

  #[error("internal flow error: {0}")]
  Internal(String),
}

impl From<AnyhowError> for FlowError {
  fn from(err: AnyhowError) -> Self {
    FlowError::Handler { source: err }
  }
}

pub type FlowResult<T, E = FlowError> = std::result::Result<T, E>;
