// src/engine/runtime.rs

use std::fmt;
use std::sync::Arc;

use tracing::{debug, info};

use crate::config::Settings;
use crate::dispatch::Dispatcher;
use crate::errors::Result;
use crate::exec::ExecutionSerializer;
use crate::schedule::{Clock, Scheduler, validate_jobs};
use crate::types::Job;

use super::{Lifecycle, RuntimeOptions};

/// Wires the scheduler and the dispatcher around one execution serializer
/// and keeps the process alive until the lifecycle drains.
pub struct Runtime {
    settings: Settings,
    jobs: Vec<Job>,
    serializer: Arc<ExecutionSerializer>,
    clock: Arc<dyn Clock>,
    lifecycle: Lifecycle,
    options: RuntimeOptions,
}

impl fmt::Debug for Runtime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Runtime")
            .field("settings", &self.settings)
            .field("jobs", &self.jobs.len())
            .field("options", &self.options)
            .finish_non_exhaustive()
    }
}

impl Runtime {
    pub fn new(
        settings: Settings,
        jobs: Vec<Job>,
        serializer: Arc<ExecutionSerializer>,
        clock: Arc<dyn Clock>,
        lifecycle: Lifecycle,
        options: RuntimeOptions,
    ) -> Self {
        Self {
            settings,
            jobs,
            serializer,
            clock,
            lifecycle,
            options,
        }
    }

    /// Start the enabled components and block until shutdown has been
    /// requested and every tracked task has finished.
    ///
    /// Invalid jobs and socket setup errors are returned before anything is
    /// spawned.
    pub async fn run(self) -> Result<()> {
        info!(
            scheduler = self.options.run_scheduler,
            dispatcher = self.options.run_dispatcher,
            "invoker runtime starting"
        );

        if self.options.run_scheduler {
            validate_jobs(&self.jobs)?;
        }

        let dispatcher = if self.options.run_dispatcher {
            Some(Dispatcher::bind(
                &self.settings,
                Arc::clone(&self.serializer),
                self.lifecycle.cancel_token(),
            )?)
        } else {
            None
        };

        if self.options.run_scheduler {
            Scheduler::new(self.jobs, Arc::clone(&self.clock), Arc::clone(&self.serializer))
                .spawn(&self.lifecycle);
        }

        if let Some(dispatcher) = dispatcher {
            self.lifecycle.spawn(dispatcher.run());
        }

        self.lifecycle.drain().await;
        debug!("all tracked tasks finished");
        info!("exiting");
        Ok(())
    }
}
