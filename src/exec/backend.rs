// src/exec/backend.rs

//! Pluggable command runner abstraction.
//!
//! Everything that needs an external command run goes through a
//! `CommandRunner`. Production code uses [`ProcessRunner`]; tests provide
//! their own implementation that records calls instead of spawning
//! processes.

use std::borrow::Cow;
use std::ffi::OsString;
use std::future::Future;
use std::path::PathBuf;
use std::pin::Pin;
use std::time::Duration;

use crate::config::Settings;
use crate::errors::RunError;

use super::task_runner::run_command;

/// Outcome of one external command.
#[derive(Debug)]
pub enum ExecutionOutcome {
    Success,
    Failed(RunError),
}

/// What a runner reports back: merged output, wall time, and outcome.
///
/// Output captured before a failure is kept.
#[derive(Debug)]
pub struct ExecutionResult {
    pub output: Vec<u8>,
    pub elapsed: Duration,
    pub outcome: ExecutionOutcome,
}

impl ExecutionResult {
    pub fn is_success(&self) -> bool {
        matches!(self.outcome, ExecutionOutcome::Success)
    }

    pub fn error(&self) -> Option<&RunError> {
        match &self.outcome {
            ExecutionOutcome::Success => None,
            ExecutionOutcome::Failed(err) => Some(err),
        }
    }

    pub fn output_lossy(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.output)
    }
}

/// Trait abstracting how a console command is executed.
pub trait CommandRunner: Send + Sync {
    /// Run the base invocation with `args` appended and wait for it.
    ///
    /// Never fails at the type level: spawn and exit failures are reported
    /// inside the returned [`ExecutionResult`].
    fn run<'a>(
        &'a self,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>>;
}

/// Real runner used in production: `<interpreter> <console> <args...>`.
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    interpreter: PathBuf,
    console: PathBuf,
}

impl ProcessRunner {
    pub fn new(interpreter: impl Into<PathBuf>, console: impl Into<PathBuf>) -> Self {
        Self {
            interpreter: interpreter.into(),
            console: console.into(),
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.interpreter.clone(), settings.console.clone())
    }

    fn argv(&self, args: &[String]) -> Vec<OsString> {
        let mut argv = Vec::with_capacity(args.len() + 1);
        argv.push(self.console.clone().into_os_string());
        argv.extend(args.iter().map(OsString::from));
        argv
    }
}

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        let argv = self.argv(args);
        Box::pin(async move { run_command(&self.interpreter, &argv).await })
    }
}
