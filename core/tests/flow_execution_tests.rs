// tests/flow_execution_tests.rs
mod common; // Reference the common module

use common::*;
use medflow::{Flow, FlowControl, FlowData, FlowError, FlowOutcome};
use serial_test::serial;
use std::sync::Arc;

#[tokio::test]
#[serial]
async fn test_flow_runs_stages_in_order() {
  setup_tracing();
  let mut flow =
    Flow::<TestContext, TestError>::new(&[("stage1", false, None), ("stage2", false, None), ("stage3", false, None)]);

  flow.on("stage1", create_simple_handler("stage1", " S1"));
  flow.on("stage2", create_simple_handler("stage2", " S2"));
  flow.on("stage3", create_simple_handler("stage3", " S3"));

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Completed);

  let guard = data.read();
  assert_eq!(guard.counter, 3);
  assert_eq!(guard.message, " S1 S2 S3");
  assert_eq!(guard.stages_executed, vec!["stage1", "stage2", "stage3"]);
}

#[tokio::test]
#[serial]
async fn test_flow_halts_on_flow_control_halt() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("stageA", false, None),
    ("haltStage", false, None),
    ("stageC", false, None),
  ]);

  flow.on("stageA", create_simple_handler("stageA", "A"));
  flow.on("haltStage", |data: FlowData<TestContext>| {
    Box::pin(async move {
      data.write().stages_executed.push("haltStage".to_string());
      Ok::<FlowControl, FlowError>(FlowControl::Halt)
    })
  });
  flow.on("stageC", create_simple_handler("stageC", "C")); // This should not run

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Halted);

  let guard = data.read();
  assert_eq!(guard.counter, 1); // Only stageA incremented
  assert_eq!(guard.message, "A");
  assert_eq!(guard.stages_executed, vec!["stageA", "haltStage"]);
}

#[tokio::test]
#[serial]
async fn test_flow_propagates_handler_error() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("good_stage", false, None),
    ("bad_stage", false, None),
    ("another_stage", false, None),
  ]);

  flow.on("good_stage", create_simple_handler("good_stage", "Good"));
  flow.on("bad_stage", create_failing_handler("bad_stage", "I am a bad stage!"));
  flow.on("another_stage", create_simple_handler("another_stage", "NeverRun"));

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_err());
  match result.err().unwrap() {
    TestError::Handler(msg) => assert_eq!(msg, "I am a bad stage!"),
    _ => panic!("Expected TestError::Handler"),
  }

  let guard = data.read();
  assert_eq!(guard.counter, 1); // Only good_stage incremented
  assert_eq!(guard.message, "Good");
  assert_eq!(guard.stages_executed, vec!["good_stage", "bad_stage"]);
}

#[tokio::test]
#[serial]
async fn test_flow_skips_stage_if_condition_met() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("stage1", false, None),
    (
      "stage_to_skip",
      false,
      Some(Arc::new(|data: FlowData<TestContext>| data.read().counter >= 1)),
    ),
    ("stage3", false, None),
  ]);

  flow.on("stage1", create_simple_handler("stage1", "1"));
  flow.on("stage_to_skip", create_simple_handler("stage_to_skip", "SKIPPED"));
  flow.on("stage3", create_simple_handler("stage3", "3"));

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Completed);

  let guard = data.read();
  assert_eq!(guard.counter, 2); // stage1 and stage3 only
  assert_eq!(guard.message, "13");
  assert_eq!(guard.stages_executed, vec!["stage1", "stage3"]);
}

#[tokio::test]
#[serial]
async fn test_optional_stage_error_is_swallowed() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[
    ("work", false, None),
    ("notify", true, None), // optional: failure must not fail the run
    ("tail", false, None),
  ]);

  flow.on("work", create_simple_handler("work", "W"));
  flow.on("notify", create_failing_handler("notify", "notification adapter down"));
  // The after-hook of a failed optional stage is abandoned too.
  flow.after("notify", create_simple_handler("notify_after", "NEVER"));
  flow.on("tail", create_simple_handler("tail", "T"));

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Completed);

  let guard = data.read();
  assert_eq!(guard.message, "WT");
  assert_eq!(guard.stages_executed, vec!["work", "notify", "tail"]);
}

#[tokio::test]
#[serial]
async fn test_optional_stage_without_handlers_is_skipped() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[("work", false, None), ("maybe_later", true, None)]);

  flow.on("work", create_simple_handler("work", "W"));

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Completed);
  assert_eq!(data.read().stages_executed, vec!["work"]);
}

#[tokio::test]
#[serial]
async fn test_before_and_after_hooks_run_around_on() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[("stage", false, None)]);

  flow.before("stage", create_simple_handler("stage_before", "B"));
  flow.on("stage", create_simple_handler("stage_on", "O"));
  flow.after("stage", create_simple_handler("stage_after", "A"));

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_ok());
  let guard = data.read();
  assert_eq!(guard.message, "BOA");
  assert_eq!(guard.stages_executed, vec!["stage_before", "stage_on", "stage_after"]);
}

#[tokio::test]
#[serial]
async fn test_halt_from_before_hook_skips_on_handlers() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[("stage", false, None), ("next", false, None)]);

  flow.before("stage", |data: FlowData<TestContext>| {
    Box::pin(async move {
      data.write().stages_executed.push("stage_before".to_string());
      Ok::<FlowControl, FlowError>(FlowControl::Halt)
    })
  });
  flow.on("stage", create_simple_handler("stage_on", "O"));
  flow.on("next", create_simple_handler("next", "N"));

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;

  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Halted);
  assert_eq!(data.read().stages_executed, vec!["stage_before"]);
}
