// src/config/loader.rs

use tracing::warn;

use crate::cli::CliArgs;
use crate::config::model::{RawSettings, SECRET_ENV_VAR, Settings, SharedSecret};
use crate::errors::Result;

/// Assemble raw settings from parsed CLI arguments and a secret.
///
/// This performs no validation; see [`load_settings`].
pub fn raw_settings_from_args(args: &CliArgs, secret: SharedSecret) -> RawSettings {
    RawSettings {
        socket_path: args.socket.clone(),
        interpreter: args.interpreter.clone(),
        console: args.console.clone(),
        secret,
        ..RawSettings::default()
    }
}

/// Read the shared secret from `INVOKER_PSK`, merge it with the CLI
/// arguments and validate the result.
///
/// The environment is read exactly once, here; the secret is never
/// refreshed while the process runs.
pub fn load_settings(args: &CliArgs) -> Result<Settings> {
    let secret = SharedSecret::from_env_value(std::env::var(SECRET_ENV_VAR).ok());
    if !secret.is_set() {
        warn!(
            var = SECRET_ENV_VAR,
            "shared secret is not set; no dispatcher request will authenticate"
        );
    }

    Settings::try_from(raw_settings_from_args(args, secret))
}
