// src/flow.rs

//! The `Flow<TData, Err>` type: construction, hook registration, and the
//! `run()` executor.

use crate::context::FlowData;
use crate::control::{FlowControl, FlowOutcome};
use crate::error::FlowError;
use crate::stage::{SkipCondition, StageDef};
use std::collections::HashMap;
use std::future::Future;
use std::pin::Pin;

use tracing::{event, instrument, span, Level};

/// Type alias for a stage handler.
///
/// A handler is an async function taking a clone of the shared
/// `FlowData<TData>` and resolving to `Result<FlowControl, Err>`. Handlers
/// must drop any lock guard before awaiting.
pub type StageHandler<TData, Err> = Box<
  dyn Fn(FlowData<TData>) -> Pin<Box<dyn Future<Output = Result<FlowControl, Err>> + Send>>
    + Send
    + Sync,
>;

/// An ordered, named-stage workflow.
///
/// `TData` is the shared context type; `Err` is the error type handlers
/// return. `Err` must be `From<FlowError>` so framework failures (e.g. a
/// missing handler) surface through the same channel.
pub struct Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  pub(crate) stages: Vec<StageDef<TData>>,
  pub(crate) before: HashMap<String, Vec<StageHandler<TData, Err>>>,
  pub(crate) on: HashMap<String, Vec<StageHandler<TData, Err>>>,
  pub(crate) after: HashMap<String, Vec<StageHandler<TData, Err>>>,
}

impl<TData, Err> Flow<TData, Err>
where
  TData: 'static + Send + Sync,
  Err: std::error::Error + From<FlowError> + Send + Sync + 'static,
{
  /// Creates a new `Flow` from `(name, optional, skip_if)` stage tuples.
  pub fn new(stage_defs: &[(&str, bool, Option<SkipCondition<TData>>)]) -> Self {
    let stages = stage_defs
      .iter()
      .map(|(name, optional, skip_cond_opt)| StageDef {
        name: (*name).to_string(),
        optional: *optional,
        skip_if: skip_cond_opt.clone(),
      })
      .collect();

    Self {
      stages,
      before: HashMap::new(),
      on: HashMap::new(),
      after: HashMap::new(),
    }
  }

  /// Panics if the named stage is absent. Registration against an unknown
  /// stage is a programming error (usually a typo), not a runtime error.
  fn ensure_stage_exists(&self, stage_name: &str) {
    if !self.stages.iter().any(|s| s.name == stage_name) {
      panic!(
        "medflow setup error: stage '{}' not found in flow definition.",
        stage_name
      );
    }
  }

  /// Registers a `before` hook for a stage. The handler's error type only
  /// needs to convert into the flow's `Err`.
  pub fn before<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(FlowData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    let final_handler: StageHandler<TData, Err> = Box::new(move |data| {
      let user_fut = handler_fn(data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self
      .before
      .entry(stage_name.to_string())
      .or_default()
      .push(final_handler);
  }

  /// Registers an `on` hook for a stage (the stage's main handler).
  pub fn on<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(FlowData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    let final_handler: StageHandler<TData, Err> = Box::new(move |data| {
      let user_fut = handler_fn(data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.on.entry(stage_name.to_string()).or_default().push(final_handler);
  }

  /// Registers an `after` hook for a stage.
  pub fn after<F, UserErr>(
    &mut self,
    stage_name: &str,
    handler_fn: impl Fn(FlowData<TData>) -> F + Send + Sync + 'static,
  ) where
    F: Future<Output = Result<FlowControl, UserErr>> + Send + 'static,
    UserErr: Into<Err> + Send + Sync + 'static,
  {
    self.ensure_stage_exists(stage_name);
    let final_handler: StageHandler<TData, Err> = Box::new(move |data| {
      let user_fut = handler_fn(data);
      Box::pin(async move { user_fut.await.map_err(Into::into) })
    });
    self.after.entry(stage_name.to_string()).or_default().push(final_handler);
  }

  /// Executes the flow against the shared context.
  ///
  /// Stage rules:
  /// - a `skip_if` returning true skips the stage entirely;
  /// - a non-optional stage with no handlers at all fails with
  ///   `FlowError::MissingHandler`;
  /// - a handler returning `FlowControl::Halt` ends the run with
  ///   `FlowOutcome::Halted`;
  /// - a handler error on an *optional* stage is logged at WARN, the rest of
  ///   that stage is abandoned, and the run continues with the next stage.
  #[instrument(
        name = "Flow::run",
        skip_all,
        fields(
            flow_context_type = %std::any::type_name::<TData>(),
            flow_error_type = %std::any::type_name::<Err>(),
            num_stages = self.stages.len(),
        ),
        err(Display)
    )]
  pub async fn run(&self, data: FlowData<TData>) -> Result<FlowOutcome, Err> {
    event!(Level::DEBUG, "Flow execution starting.");

    'stages: for (stage_idx, stage_def) in self.stages.iter().enumerate() {
      let stage_name = stage_def.name.as_str();

      let stage_span = span!(
        Level::INFO,
        "flow_stage",
        stage = stage_name,
        stage_index = stage_idx,
        optional = stage_def.optional
      );
      let _stage_span_guard = stage_span.enter();
      event!(Level::DEBUG, "Processing stage.");

      if let Some(skip_cond_fn) = &stage_def.skip_if {
        if skip_cond_fn(data.clone()) {
          event!(Level::INFO, "Stage skipped by 'skip_if' condition.");
          continue;
        }
      }

      let has_any_handler = [&self.before, &self.on, &self.after]
        .iter()
        .any(|phase| phase.get(stage_name).map_or(false, |v| !v.is_empty()));

      if !has_any_handler {
        if stage_def.optional {
          event!(Level::DEBUG, "Optional stage has no handlers, skipping.");
          continue;
        }
        event!(Level::ERROR, "Non-optional stage has no handlers.");
        return Err(Err::from(FlowError::MissingHandler {
          stage: stage_def.name.clone(),
        }));
      }

      for (phase_name, phase_map) in [
        ("before", &self.before),
        ("on", &self.on),
        ("after", &self.after),
      ] {
        let Some(handlers) = phase_map.get(stage_name) else {
          continue;
        };
        for (handler_idx, handler_fn) in handlers.iter().enumerate() {
          let handler_span = span!(
            Level::DEBUG,
            "stage_handler",
            phase = phase_name,
            handler_index = handler_idx
          );
          let _handler_span_guard = handler_span.enter();
          match handler_fn(data.clone()).await {
            Ok(FlowControl::Continue) => {}
            Ok(FlowControl::Halt) => {
              event!(Level::INFO, "Flow halted by a handler.");
              return Ok(FlowOutcome::Halted);
            }
            Err(e) => {
              if stage_def.optional {
                event!(
                  Level::WARN,
                  error = %e,
                  "Optional stage handler failed; continuing with next stage."
                );
                continue 'stages;
              }
              event!(Level::ERROR, error = %e, "Stage handler failed.");
              return Err(e);
            }
          }
        }
      }
      event!(Level::DEBUG, "Stage finished.");
    }

    event!(Level::DEBUG, "Flow execution completed.");
    Ok(FlowOutcome::Completed)
  }
}
