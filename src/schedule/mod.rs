// src/schedule/mod.rs

//! Time-triggered jobs.
//!
//! - [`occurrence`] computes the next wall-clock instant for a cadence.
//! - [`clock`] abstracts "now" so loops can be driven from tests.
//! - [`scheduler`] owns one timed loop per job.
//! - [`jobs`] holds the built-in job list.

pub mod clock;
pub mod jobs;
pub mod occurrence;
pub mod scheduler;

pub use clock::{Clock, LocalClock};
pub use jobs::{default_jobs, validate_jobs};
pub use occurrence::{next_occurrence, rearm_interval};
pub use scheduler::{Scheduler, run_job};
