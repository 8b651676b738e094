// src/lib.rs

//! Medflow: a small async flow engine for multi-step business workflows.
//!
//! A `Flow` is an ordered list of named stages. Each stage can carry
//! `before`/`on`/`after` hooks, may be declared optional (its handler
//! failures are logged, not fatal), and may carry a skip condition evaluated
//! against the shared context. Handlers signal `Continue` or `Halt`; the run
//! ends with `FlowOutcome::Completed` or `FlowOutcome::Halted`.
//!
//! Typical use:
//! 1. Define a context struct for the workflow and wrap it in `FlowData`.
//! 2. Build a `Flow<Ctx, AppError>` with its stage list.
//! 3. Register async handlers with `.on()`, `.before()`, `.after()`.
//! 4. Call `flow.run(data).await` and inspect the context afterwards.

pub mod context;
pub mod control;
pub mod error;
pub mod flow;
pub mod stage;

pub use crate::context::FlowData;
pub use crate::control::{FlowControl, FlowOutcome};
pub use crate::error::{FlowError, FlowResult};
pub use crate::flow::{Flow, StageHandler};
pub use crate::stage::{SkipCondition, StageDef};
