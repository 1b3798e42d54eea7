use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::time::Instant;
use invoker::errors::RunError;
use invoker::exec::{CommandRunner, ExecutionOutcome, ExecutionResult};

/// One call seen by a [`RecordingRunner`].
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub args: Vec<String>,
    pub entered: Instant,
    pub exited: Instant,
}

#[derive(Debug, Default)]
struct Shared {
    calls: Mutex<Vec<RecordedCall>>,
    started: AtomicUsize,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

/// A fake runner that:
/// - records every call with enter/exit instants
/// - tracks how many calls overlap
/// - sleeps for a configurable delay, then reports a canned result.
#[derive(Debug, Clone)]
pub struct RecordingRunner {
    shared: Arc<Shared>,
    delay: Duration,
    output: Vec<u8>,
    exit_code: Option<i32>,
}

impl RecordingRunner {
    pub fn new() -> Self {
        Self {
            shared: Arc::new(Shared::default()),
            delay: Duration::ZERO,
            output: Vec::new(),
            exit_code: None,
        }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn with_output(mut self, output: &str) -> Self {
        self.output = output.as_bytes().to_vec();
        self
    }

    /// Every call fails with `exit status <code>`.
    pub fn failing(mut self, code: i32) -> Self {
        self.exit_code = Some(code);
        self
    }

    /// A handle for inspecting calls after the runner has been moved into
    /// a serializer.
    pub fn probe(&self) -> RunnerProbe {
        RunnerProbe {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl Default for RecordingRunner {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandRunner for RecordingRunner {
    fn run<'a>(
        &'a self,
        args: &'a [String],
    ) -> Pin<Box<dyn Future<Output = ExecutionResult> + Send + 'a>> {
        Box::pin(async move {
            let shared = &self.shared;
            let entered = Instant::now();
            shared.started.fetch_add(1, Ordering::SeqCst);
            let now_in_flight = shared.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            shared.max_in_flight.fetch_max(now_in_flight, Ordering::SeqCst);

            if !self.delay.is_zero() {
                tokio::time::sleep(self.delay).await;
            }

            shared.in_flight.fetch_sub(1, Ordering::SeqCst);
            let exited = Instant::now();
            shared.calls.lock().unwrap().push(RecordedCall {
                args: args.to_vec(),
                entered,
                exited,
            });

            let outcome = match self.exit_code {
                Some(code) => ExecutionOutcome::Failed(RunError::Exit(code)),
                None => ExecutionOutcome::Success,
            };

            ExecutionResult {
                output: self.output.clone(),
                elapsed: exited - entered,
                outcome,
            }
        })
    }
}

/// Read-only view on what a [`RecordingRunner`] has seen.
#[derive(Debug, Clone)]
pub struct RunnerProbe {
    shared: Arc<Shared>,
}

impl RunnerProbe {
    /// Completed calls, in completion order.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.shared.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.shared.calls.lock().unwrap().len()
    }

    /// Calls that have entered the runner, finished or not.
    pub fn started(&self) -> usize {
        self.shared.started.load(Ordering::SeqCst)
    }

    pub fn max_in_flight(&self) -> usize {
        self.shared.max_in_flight.load(Ordering::SeqCst)
    }

    /// Poll until at least `n` calls have entered the runner.
    pub async fn wait_for_started(&self, n: usize) {
        while self.started() < n {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    }
}
