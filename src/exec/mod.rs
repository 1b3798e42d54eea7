// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the `CommandRunner` trait, the execution result
//!   types, and the production `ProcessRunner` (interpreter + console script).
//! - [`task_runner`] spawns one process with `tokio::process::Command` and
//!   collects its merged stdout/stderr.
//! - [`serializer`] wraps a runner behind the process-wide lock so at most
//!   one external command runs at any time.

pub mod backend;
pub mod serializer;
pub mod task_runner;

pub use backend::{CommandRunner, ExecutionOutcome, ExecutionResult, ProcessRunner};
pub use serializer::ExecutionSerializer;
pub use task_runner::run_command;
