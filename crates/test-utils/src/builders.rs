#![allow(dead_code)]

use std::path::Path;
use std::time::Duration;

use chrono::{DateTime, Local, TimeZone};
use invoker::config::{RawSettings, Settings, SharedSecret};
use invoker::schedule::Clock;

/// Builder for `Settings` to simplify test setup.
pub struct SettingsBuilder {
    raw: RawSettings,
}

impl SettingsBuilder {
    pub fn new() -> Self {
        Self {
            raw: RawSettings::default(),
        }
    }

    pub fn socket_path(mut self, path: impl AsRef<Path>) -> Self {
        self.raw.socket_path = path.as_ref().to_path_buf();
        self
    }

    pub fn secret(mut self, secret: &str) -> Self {
        self.raw.secret = SharedSecret::new(secret);
        self
    }

    pub fn interpreter(mut self, path: impl AsRef<Path>) -> Self {
        self.raw.interpreter = path.as_ref().to_path_buf();
        self
    }

    pub fn console(mut self, path: impl AsRef<Path>) -> Self {
        self.raw.console = path.as_ref().to_path_buf();
        self
    }

    pub fn accept_backoff(mut self, backoff: Duration) -> Self {
        self.raw.accept_backoff = backoff;
        self
    }

    pub fn raw(self) -> RawSettings {
        self.raw
    }

    pub fn build(self) -> Settings {
        Settings::try_from(self.raw).expect("Failed to build valid settings from builder")
    }
}

impl Default for SettingsBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A clock pinned to one local instant.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Local>);

impl FixedClock {
    /// Local wall time `y-m-d h:mi:s`.
    pub fn at(y: i32, m: u32, d: u32, h: u32, mi: u32, s: u32) -> Self {
        let now = Local
            .with_ymd_and_hms(y, m, d, h, mi, s)
            .earliest()
            .expect("valid local time");
        Self(now)
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Local> {
        self.0
    }
}
