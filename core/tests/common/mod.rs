// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use medflow::{FlowControl, FlowData, FlowError, StageHandler};
use tracing::Level;

// --- Common Context Struct ---
#[derive(Clone, Debug, Default)]
pub struct TestContext {
  pub counter: i32,
  pub message: String,
  pub stages_executed: Vec<String>,
  pub should_halt_at: Option<String>,
}

// --- Common Error Type for Tests ---
#[derive(Debug, thiserror::Error, Clone, PartialEq, Eq)] // Clone, PartialEq, Eq for assertions
pub enum TestError {
  #[error("medflow framework error: {0:?}")] // Stored as String for Eq comparison
  Flow(String),

  #[error("Test handler failed: {0}")]
  Handler(String),
}

impl From<FlowError> for TestError {
  fn from(fe: FlowError) -> Self {
    TestError::Flow(format!("{:?}", fe))
  }
}

// --- Common Handler Creators ---
pub fn create_simple_handler(
  stage_name: &'static str,
  message_to_append: &'static str,
) -> StageHandler<TestContext, TestError> {
  Box::new(move |data: FlowData<TestContext>| {
    let stage_name_owned = stage_name.to_string();
    Box::pin(async move {
      let mut guard = data.write();
      guard.counter += 1;
      guard.message.push_str(message_to_append);
      guard.stages_executed.push(stage_name_owned.clone());
      tracing::debug!(target: "test_handlers", stage = %stage_name_owned, "executed, counter: {}, message: '{}'", guard.counter, guard.message);
      if let Some(halt_stage) = &guard.should_halt_at {
        if halt_stage == stage_name_owned.as_str() {
          return Ok(FlowControl::Halt);
        }
      }
      Ok(FlowControl::Continue)
    })
  })
}

pub fn create_failing_handler(
  stage_name: &'static str,
  error_message: &'static str,
) -> StageHandler<TestContext, TestError> {
  Box::new(move |data: FlowData<TestContext>| {
    let stage_name_owned = stage_name.to_string();
    let error_message_owned = error_message.to_string();
    Box::pin(async move {
      data.write().stages_executed.push(stage_name_owned.clone());
      tracing::warn!(target: "test_handlers", stage = %stage_name_owned, "failing with: '{}'", error_message_owned);
      Err(TestError::Handler(error_message_owned))
    })
  })
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
