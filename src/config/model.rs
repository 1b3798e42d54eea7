// src/config/model.rs

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_SOCKET_PATH: &str = "/run/invoker/invoker.sock";
pub const DEFAULT_INTERPRETER: &str = "/usr/bin/php";
pub const DEFAULT_CONSOLE: &str = "/elabftw/bin/console";

/// Environment variable holding the pre-shared key.
pub const SECRET_ENV_VAR: &str = "INVOKER_PSK";

/// Pause after an accept error that was not caused by shutdown.
pub const DEFAULT_ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Pre-shared key used to authenticate dispatcher requests.
///
/// An absent or empty key is stored as "unset": no request can ever
/// authenticate against it, not even one with an empty prefix.
#[derive(Clone, Default, PartialEq, Eq)]
pub struct SharedSecret(Option<String>);

impl SharedSecret {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        if value.is_empty() {
            Self(None)
        } else {
            Self(Some(value))
        }
    }

    pub fn unset() -> Self {
        Self(None)
    }

    pub fn from_env_value(value: Option<String>) -> Self {
        value.map(Self::new).unwrap_or_default()
    }

    pub fn is_set(&self) -> bool {
        self.0.is_some()
    }

    /// Exact comparison against the prefix of an inbound line.
    pub fn matches(&self, candidate: &str) -> bool {
        match &self.0 {
            Some(secret) => secret == candidate,
            None => false,
        }
    }
}

impl fmt::Debug for SharedSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(_) => f.write_str("SharedSecret(<redacted>)"),
            None => f.write_str("SharedSecret(<unset>)"),
        }
    }
}

/// Settings as assembled from CLI + environment, before validation.
#[derive(Debug, Clone)]
pub struct RawSettings {
    pub socket_path: PathBuf,
    pub interpreter: PathBuf,
    pub console: PathBuf,
    pub secret: SharedSecret,
    pub accept_backoff: Duration,
}

impl Default for RawSettings {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from(DEFAULT_SOCKET_PATH),
            interpreter: PathBuf::from(DEFAULT_INTERPRETER),
            console: PathBuf::from(DEFAULT_CONSOLE),
            secret: SharedSecret::unset(),
            accept_backoff: DEFAULT_ACCEPT_BACKOFF,
        }
    }
}

/// Validated, immutable process settings.
///
/// Constructed once at startup (see [`crate::config::load_settings`]) and
/// handed to the scheduler and dispatcher; never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Settings {
    pub socket_path: PathBuf,
    pub interpreter: PathBuf,
    pub console: PathBuf,
    pub secret: SharedSecret,
    pub accept_backoff: Duration,
}

impl Settings {
    /// Build settings without running validation.
    ///
    /// Use `Settings::try_from(raw)` to get validated settings.
    pub(crate) fn new_unchecked(raw: RawSettings) -> Self {
        Self {
            socket_path: raw.socket_path,
            interpreter: raw.interpreter,
            console: raw.console,
            secret: raw.secret,
            accept_backoff: raw.accept_backoff,
        }
    }
}
