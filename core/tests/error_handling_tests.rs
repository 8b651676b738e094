// tests/error_handling_tests.rs
mod common;
use common::*;
use medflow::{Flow, FlowControl, FlowData, FlowError, FlowOutcome};
use serial_test::serial;

#[tokio::test]
#[serial]
async fn test_flow_run_catches_missing_handler() {
  setup_tracing();
  let flow = Flow::<TestContext, TestError>::new(&[("missing", false, None)]);
  let data = FlowData::new(TestContext::default());
  let result = flow.run(data).await;
  assert!(result.is_err());
  match result.err().unwrap() {
    TestError::Flow(s) => {
      assert!(s.contains("MissingHandler"));
      assert!(s.contains("missing"));
    }
    other => panic!("Expected TestError::Flow(MissingHandler), got {:?}", other),
  }
}

// Test a flow whose error type IS FlowError.
#[tokio::test]
#[serial]
async fn test_flow_with_flow_error_type() {
  setup_tracing();
  let mut flow = Flow::<TestContext, FlowError>::new(&[("task", false, None)]);

  flow.on("task", |data: FlowData<TestContext>| {
    Box::pin(async move {
      data.write().counter = 1;
      Ok::<FlowControl, FlowError>(FlowControl::Continue)
    })
  });

  let data = FlowData::new(TestContext::default());
  let result = flow.run(data.clone()).await;
  assert!(result.is_ok());
  assert_eq!(result.unwrap(), FlowOutcome::Completed);
  assert_eq!(data.read().counter, 1);

  // Test failing with a FlowError
  let mut failing_flow = Flow::<TestContext, FlowError>::new(&[("fail_task", false, None)]);
  failing_flow.on("fail_task", |_data| {
    Box::pin(async move { Err(FlowError::Internal("Intentional FlowError".to_string())) })
  });
  let fail_data = FlowData::new(TestContext::default());
  let fail_result = failing_flow.run(fail_data).await;
  assert!(fail_result.is_err());
  match fail_result.err().unwrap() {
    FlowError::Internal(s) => assert_eq!(s, "Intentional FlowError"),
    _ => panic!("Expected FlowError::Internal"),
  }
}

#[tokio::test]
#[serial]
#[should_panic(expected = "medflow setup error")]
async fn test_registering_handler_on_unknown_stage_panics() {
  setup_tracing();
  let mut flow = Flow::<TestContext, TestError>::new(&[("known", false, None)]);
  flow.on("unknown", create_simple_handler("unknown", "X"));
}
