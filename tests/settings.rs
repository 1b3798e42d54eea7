// tests/settings.rs

mod common;
use crate::common::builders::SettingsBuilder;

use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;
use invoker::cli::{CliArgs, Component};
use invoker::config::{SharedSecret, Settings, raw_settings_from_args};
use invoker::errors::InvokerError;
use invoker::logging::{format_elapsed, parse_level_str};

#[test]
fn defaults_point_at_the_console() {
    let args = CliArgs::parse_from(["invoker"]);
    let settings = Settings::try_from(raw_settings_from_args(&args, SharedSecret::new("abc"))).unwrap();

    assert_eq!(settings.socket_path, PathBuf::from("/run/invoker/invoker.sock"));
    assert_eq!(settings.interpreter, PathBuf::from("/usr/bin/php"));
    assert_eq!(settings.console, PathBuf::from("/elabftw/bin/console"));
    assert_eq!(settings.accept_backoff, Duration::from_millis(100));
    assert!(settings.secret.matches("abc"));
    assert!(args.runs_scheduler());
    assert!(args.runs_dispatcher());
}

#[test]
fn cli_overrides_paths_and_components() {
    let args = CliArgs::parse_from([
        "invoker",
        "--socket",
        "/tmp/inv.sock",
        "--php",
        "/usr/local/bin/php",
        "--console",
        "/srv/app/bin/console",
        "--only",
        "dispatcher",
    ]);

    assert_eq!(args.only, Some(Component::Dispatcher));
    assert!(!args.runs_scheduler());
    assert!(args.runs_dispatcher());

    let raw = raw_settings_from_args(&args, SharedSecret::unset());
    assert_eq!(raw.socket_path, PathBuf::from("/tmp/inv.sock"));
    assert_eq!(raw.interpreter, PathBuf::from("/usr/local/bin/php"));
    assert_eq!(raw.console, PathBuf::from("/srv/app/bin/console"));
}

#[test]
fn empty_socket_path_is_a_config_error() {
    let raw = SettingsBuilder::new().socket_path("").raw();

    match Settings::try_from(raw) {
        Err(InvokerError::ConfigError(msg)) => assert!(msg.contains("socket path")),
        Err(e) => panic!("Expected ConfigError, got: {:?}", e),
        Ok(_) => panic!("Expected error, got Ok"),
    }
}

#[test]
fn zero_backoff_is_a_config_error() {
    let raw = SettingsBuilder::new().accept_backoff(Duration::ZERO).raw();

    assert!(matches!(Settings::try_from(raw), Err(InvokerError::ConfigError(_))));
}

#[test]
fn missing_secret_is_allowed_but_never_matches() {
    let settings = SettingsBuilder::new().build();

    assert!(!settings.secret.is_set());
    assert!(!settings.secret.matches(""));
    assert_eq!(SharedSecret::from_env_value(Some(String::new())), SharedSecret::unset());
    assert_eq!(SharedSecret::from_env_value(None), SharedSecret::unset());
}

#[test]
fn elapsed_is_rendered_as_minutes_and_seconds() {
    assert_eq!(format_elapsed(Duration::from_millis(3_400)), "0m03s");
    assert_eq!(format_elapsed(Duration::from_secs(727)), "12m07s");
}

#[test]
fn log_levels_parse_loosely() {
    assert_eq!(parse_level_str(" Warning "), Some(tracing::Level::WARN));
    assert_eq!(parse_level_str("debug"), Some(tracing::Level::DEBUG));
    assert_eq!(parse_level_str("loud"), None);
}
