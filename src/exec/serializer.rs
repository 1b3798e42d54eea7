// src/exec/serializer.rs

//! Process-wide execution gate.

use std::fmt;

use tokio::sync::Mutex;
use tracing::trace;

use super::backend::{CommandRunner, ExecutionResult};

/// Admits one command at a time, whoever asks for it.
///
/// The runner lives inside the mutex, so holding the guard is the only way
/// to reach it. Scheduler loops and dispatcher connections share one
/// instance through an `Arc`. Waiters are admitted in FIFO order (tokio's
/// mutex is fair); callers must not rely on that.
pub struct ExecutionSerializer {
    runner: Mutex<Box<dyn CommandRunner>>,
}

impl ExecutionSerializer {
    pub fn new<R>(runner: R) -> Self
    where
        R: CommandRunner + 'static,
    {
        Self::from_boxed(Box::new(runner))
    }

    pub fn from_boxed(runner: Box<dyn CommandRunner>) -> Self {
        Self {
            runner: Mutex::new(runner),
        }
    }

    /// Wait for the gate, run `args`, release the gate, return the result.
    pub async fn execute(&self, args: &[String]) -> ExecutionResult {
        let runner = self.runner.lock().await;
        trace!(?args, "execution lock acquired");
        let result = runner.run(args).await;
        trace!(?args, success = result.is_success(), "execution lock released");
        result
    }
}

impl fmt::Debug for ExecutionSerializer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExecutionSerializer")
            .field("busy", &self.runner.try_lock().is_err())
            .finish_non_exhaustive()
    }
}
