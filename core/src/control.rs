// src/control.rs

//! Signals for controlling flow execution and the outcome of a run.

/// Signal from a handler indicating whether the flow should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowControl {
  /// Proceed with the remaining handlers and stages.
  Continue,
  /// Halt the flow immediately. No further handlers run.
  Halt,
}

/// Outcome of a full flow execution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowOutcome {
  /// Every non-skipped stage ran to completion.
  Completed,
  /// A handler returned `FlowControl::Halt`.
  Halted,
}
