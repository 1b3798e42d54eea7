// src/lib.rs

pub mod cli;
pub mod config;
pub mod dispatch;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod schedule;
pub mod types;

use std::sync::Arc;

use anyhow::Result;
use tracing::debug;

use crate::cli::CliArgs;
use crate::config::{Settings, load_settings};
use crate::engine::{Lifecycle, Runtime, RuntimeOptions};
use crate::exec::{ExecutionSerializer, ProcessRunner};
use crate::schedule::{Clock, LocalClock, default_jobs, next_occurrence};
use crate::types::Job;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - settings (CLI + `INVOKER_PSK`)
/// - the process runner behind the execution serializer
/// - scheduler loops and the socket dispatcher
/// - SIGINT/SIGTERM handling and the graceful drain
pub async fn run(args: CliArgs) -> Result<()> {
    let settings = load_settings(&args)?;
    let jobs = default_jobs();

    if args.dry_run {
        print_dry_run(&settings, &jobs, &LocalClock);
        return Ok(());
    }

    let runner = ProcessRunner::from_settings(&settings);
    let serializer = Arc::new(ExecutionSerializer::new(runner));

    let lifecycle = Lifecycle::new();
    lifecycle.listen_for_signals()?;

    let options = RuntimeOptions {
        run_scheduler: args.runs_scheduler(),
        run_dispatcher: args.runs_dispatcher(),
    };

    let runtime = Runtime::new(
        settings,
        jobs,
        serializer,
        Arc::new(LocalClock),
        lifecycle,
        options,
    );
    runtime.run().await?;
    Ok(())
}

/// Simple dry-run output: settings, jobs and their next occurrence.
fn print_dry_run(settings: &Settings, jobs: &[Job], clock: &dyn Clock) {
    let now = clock.now();

    println!("invoker dry-run");
    println!("  socket = {}", settings.socket_path.display());
    println!(
        "  command = {} {}",
        settings.interpreter.display(),
        settings.console.display()
    );
    println!("  secret set = {}", settings.secret.is_set());
    println!();

    println!("jobs ({}):", jobs.len());
    for job in jobs {
        println!("  - {}", job.name());
        println!("      cadence: {}", job.cadence);
        println!(
            "      next: {}",
            next_occurrence(&job.cadence, &now).to_rfc3339()
        );
    }

    debug!("dry-run complete (no execution)");
}
