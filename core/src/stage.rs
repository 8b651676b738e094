// src/stage.rs

//! Definition of a single stage within a flow.

use crate::context::FlowData;
use std::sync::Arc;

/// Condition evaluated against the shared context before a stage runs.
/// Returning `true` skips the stage entirely.
pub type SkipCondition<T> = Arc<dyn Fn(FlowData<T>) -> bool + Send + Sync + 'static>;

/// A stage's name, optionality, and skip condition.
///
/// An *optional* stage tolerates failure: a missing handler is fine, and a
/// handler error is logged and swallowed rather than failing the run.
#[derive(Clone)]
pub struct StageDef<T: 'static + Send + Sync> {
  pub name: String,
  pub optional: bool,
  pub skip_if: Option<SkipCondition<T>>,
}

impl<T: 'static + Send + Sync> std::fmt::Debug for StageDef<T> {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("StageDef")
      .field("name", &self.name)
      .field("optional", &self.optional)
      .field("skip_if_present", &self.skip_if.is_some())
      .finish()
  }
}
