// src/config/validate.rs

use std::path::Path;

use crate::config::model::{RawSettings, Settings};
use crate::errors::{InvokerError, Result};

impl TryFrom<RawSettings> for Settings {
    type Error = InvokerError;

    fn try_from(raw: RawSettings) -> std::result::Result<Self, Self::Error> {
        validate_settings(&raw)?;
        Ok(Settings::new_unchecked(raw))
    }
}

/// Check the invariants every component relies on.
pub fn validate_settings(raw: &RawSettings) -> Result<()> {
    ensure_non_empty("socket path", &raw.socket_path)?;
    ensure_non_empty("interpreter", &raw.interpreter)?;
    ensure_non_empty("console", &raw.console)?;

    if raw.accept_backoff.is_zero() {
        return Err(InvokerError::ConfigError(
            "accept backoff must be greater than zero".to_string(),
        ));
    }

    Ok(())
}

fn ensure_non_empty(what: &str, path: &Path) -> Result<()> {
    if path.as_os_str().is_empty() {
        return Err(InvokerError::ConfigError(format!("{what} must not be empty")));
    }
    Ok(())
}
