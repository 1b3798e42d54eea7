// src/schedule/jobs.rs

use chrono::Weekday;

use crate::errors::{InvokerError, Result};
use crate::types::{Cadence, Job};

/// The maintenance jobs run by the scheduler, fixed at build time.
pub fn default_jobs() -> Vec<Job> {
    vec![
        Job::new(
            Cadence::Weekly {
                weekday: Weekday::Sun,
                hour: 1,
                minute: 45,
            },
            ["notifications:send-expiration"],
        ),
        Job::new(
            Cadence::Daily {
                hour: 13,
                minute: 37,
            },
            ["notifications:tsbalance"],
        ),
        Job::new(Cadence::Daily { hour: 3, minute: 37 }, ["idps:refresh"]),
        Job::new(Cadence::EveryMinute, ["notifications:send"]),
    ]
}

/// Reject jobs that could never fire correctly.
pub fn validate_jobs(jobs: &[Job]) -> Result<()> {
    for job in jobs {
        if !job.cadence.is_valid() {
            return Err(InvokerError::ConfigError(format!(
                "job '{}' has an out-of-range time: {}",
                job.name(),
                job.cadence
            )));
        }
        if job.args.is_empty() {
            return Err(InvokerError::ConfigError(format!(
                "job scheduled {} has no console arguments",
                job.cadence
            )));
        }
    }
    Ok(())
}
