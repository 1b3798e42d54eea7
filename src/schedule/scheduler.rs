// src/schedule/scheduler.rs

//! One timed loop per job.
//!
//! Each loop computes the first occurrence from the wall clock, waits for it
//! (or for shutdown), fires, and then re-arms with the cadence's fixed
//! interval. The interval is measured on the monotonic clock, so wall-clock
//! jumps after the first firing are not corrected for.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use tokio::time::{Instant, MissedTickBehavior, interval_at, sleep_until};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info};

use crate::engine::Lifecycle;
use crate::exec::{ExecutionOutcome, ExecutionSerializer};
use crate::logging::format_elapsed;
use crate::schedule::clock::Clock;
use crate::schedule::occurrence::{next_occurrence, rearm_interval};
use crate::types::{Cadence, Job};

/// Owns the configured jobs until they are handed to their loops.
#[derive(Debug)]
pub struct Scheduler {
    jobs: Vec<Job>,
    clock: Arc<dyn Clock>,
    serializer: Arc<ExecutionSerializer>,
}

impl Scheduler {
    pub fn new(
        jobs: Vec<Job>,
        clock: Arc<dyn Clock>,
        serializer: Arc<ExecutionSerializer>,
    ) -> Self {
        Self {
            jobs,
            clock,
            serializer,
        }
    }

    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// Spawn one tracked task per job. Each task stops when the lifecycle's
    /// cancellation token fires.
    pub fn spawn(self, lifecycle: &Lifecycle) {
        for job in self.jobs {
            let clock = Arc::clone(&self.clock);
            let serializer = Arc::clone(&self.serializer);
            let cancel = lifecycle.cancel_token();
            lifecycle.spawn(async move {
                run_job(job, clock, serializer, cancel).await;
            });
        }
        info!("scheduled tasks started");
    }
}

/// Drive a single job until `cancel` fires.
pub async fn run_job(
    job: Job,
    clock: Arc<dyn Clock>,
    serializer: Arc<ExecutionSerializer>,
    cancel: CancellationToken,
) {
    let name = job.name();
    debug!(job = %name, cadence = %job.cadence, "job loop started");

    match job.cadence {
        Cadence::EveryMinute => run_every_minute(&job, clock.as_ref(), &serializer, &cancel).await,
        _ => run_fixed_interval(&job, clock.as_ref(), &serializer, &cancel).await,
    }

    debug!(job = %name, "job loop stopped");
}

async fn run_fixed_interval(
    job: &Job,
    clock: &dyn Clock,
    serializer: &ExecutionSerializer,
    cancel: &CancellationToken,
) {
    let now = clock.now();
    let first = next_occurrence(&job.cadence, &now);
    debug!(job = %job.name(), next = %first.to_rfc3339(), "next occurrence");

    let interval = rearm_interval(&job.cadence);
    let mut deadline = Instant::now() + until(&first, &now);

    loop {
        if !wait_until(deadline, cancel).await {
            return;
        }
        fire(job, serializer).await;
        deadline += interval;
    }
}

async fn run_every_minute(
    job: &Job,
    clock: &dyn Clock,
    serializer: &ExecutionSerializer,
    cancel: &CancellationToken,
) {
    let now = clock.now();
    let boundary = next_occurrence(&Cadence::EveryMinute, &now);
    let aligned = Instant::now() + until(&boundary, &now);
    if !wait_until(aligned, cancel).await {
        return;
    }

    let period = rearm_interval(&Cadence::EveryMinute);
    let mut ticker = interval_at(aligned + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => return,
            _ = ticker.tick() => fire(job, serializer).await,
        }
    }
}

/// Sleep until `deadline`. Returns `false` if `cancel` fired first.
async fn wait_until(deadline: Instant, cancel: &CancellationToken) -> bool {
    tokio::select! {
        biased;
        _ = cancel.cancelled() => false,
        _ = sleep_until(deadline) => true,
    }
}

fn until(target: &DateTime<Local>, now: &DateTime<Local>) -> Duration {
    target
        .signed_duration_since(*now)
        .to_std()
        .unwrap_or(Duration::ZERO)
}

/// Run the job's command through the serializer and log the outcome.
///
/// Failures are logged and swallowed; the loop keeps going.
async fn fire(job: &Job, serializer: &ExecutionSerializer) {
    let name = job.name();
    debug!(job = %name, "running scheduled job");

    let result = serializer.execute(&job.args).await;
    let elapsed = format_elapsed(result.elapsed);

    match &result.outcome {
        ExecutionOutcome::Success => {
            info!(job = %name, elapsed = %elapsed, "scheduled job finished");
        }
        ExecutionOutcome::Failed(err) => {
            error!(
                job = %name,
                elapsed = %elapsed,
                "error: {err} - output:\n{}",
                result.output_lossy()
            );
        }
    }
}
