// src/engine/lifecycle.rs

use std::future::Future;

use tokio::signal::unix::{SignalKind, signal};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::info;

use crate::errors::Result;

/// Process-wide shutdown state.
///
/// The cancellation token is set at most once and never reset. Every task
/// that must finish before the process exits is spawned through
/// [`Lifecycle::spawn`] so [`Lifecycle::drain`] can wait for it.
#[derive(Debug, Clone, Default)]
pub struct Lifecycle {
    cancel: CancellationToken,
    tasks: TaskTracker,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_shutting_down(&self) -> bool {
        self.cancel.is_cancelled()
    }

    /// Raise the cancellation signal. Idempotent.
    pub fn request_shutdown(&self) {
        if !self.cancel.is_cancelled() {
            info!("shutdown requested");
        }
        self.cancel.cancel();
    }

    /// Spawn a task the process has to wait for before exiting.
    pub fn spawn<F>(&self, future: F) -> JoinHandle<F::Output>
    where
        F: Future + Send + 'static,
        F::Output: Send + 'static,
    {
        self.tasks.spawn(future)
    }

    /// Number of tracked tasks still running.
    pub fn in_flight(&self) -> usize {
        self.tasks.len()
    }

    /// Raise the cancellation signal on SIGINT or SIGTERM.
    ///
    /// The listener task is not tracked: it ends on its own once the
    /// signal is raised by any path.
    pub fn listen_for_signals(&self) -> Result<()> {
        let mut interrupt = signal(SignalKind::interrupt())?;
        let mut terminate = signal(SignalKind::terminate())?;
        let lifecycle = self.clone();

        tokio::spawn(async move {
            tokio::select! {
                _ = interrupt.recv() => {}
                _ = terminate.recv() => {}
                _ = lifecycle.cancel.cancelled() => return,
            }
            info!("shutdown signal received, terminating");
            lifecycle.request_shutdown();
        });

        Ok(())
    }

    /// Wait for the cancellation signal, then for every tracked task.
    pub async fn drain(&self) {
        self.cancel.cancelled().await;
        self.tasks.close();
        self.tasks.wait().await;
    }
}
