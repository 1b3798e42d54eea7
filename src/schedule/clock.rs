// src/schedule/clock.rs

use std::fmt::Debug;

use chrono::{DateTime, Local};

/// Source of wall-clock time for the scheduler.
///
/// Production uses [`LocalClock`]; tests pin "now" to a fixed instant.
pub trait Clock: Send + Sync + Debug {
    fn now(&self) -> DateTime<Local>;
}

/// The host's local wall clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalClock;

impl Clock for LocalClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
