use std::fmt;

use chrono::Weekday;

/// How often, and at which wall-clock alignment, a job fires.
///
/// - `Weekly`: once a week on `weekday` at `hour:minute`.
/// - `Daily`: once a day at `hour:minute`.
/// - `EveryMinute`: on every minute boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cadence {
    Weekly { weekday: Weekday, hour: u32, minute: u32 },
    Daily { hour: u32, minute: u32 },
    EveryMinute,
}

impl Cadence {
    /// `true` when hour/minute are inside a clock face.
    pub fn is_valid(&self) -> bool {
        match *self {
            Cadence::Weekly { hour, minute, .. } | Cadence::Daily { hour, minute } => {
                hour < 24 && minute < 60
            }
            Cadence::EveryMinute => true,
        }
    }
}

impl fmt::Display for Cadence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cadence::Weekly {
                weekday,
                hour,
                minute,
            } => write!(f, "weekly on {weekday} at {hour:02}:{minute:02}"),
            Cadence::Daily { hour, minute } => write!(f, "daily at {hour:02}:{minute:02}"),
            Cadence::EveryMinute => write!(f, "every minute"),
        }
    }
}

/// A scheduled maintenance job: a cadence plus the console arguments to run.
///
/// Jobs are built once at startup and owned by exactly one scheduler loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub cadence: Cadence,
    pub args: Vec<String>,
}

impl Job {
    pub fn new<I, S>(cadence: Cadence, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            cadence,
            args: args.into_iter().map(Into::into).collect(),
        }
    }

    /// Name used in logs: the arguments joined by spaces.
    pub fn name(&self) -> String {
        self.args.join(" ")
    }
}
