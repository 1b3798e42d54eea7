// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::config::model::{DEFAULT_CONSOLE, DEFAULT_INTERPRETER, DEFAULT_SOCKET_PATH};

/// Command-line arguments for `invoker`.
///
/// The shared secret is never taken from the command line; it is read from
/// `INVOKER_PSK` so it does not show up in process listings.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "invoker",
    version,
    about = "Run scheduled and on-demand console commands, one at a time.",
    long_about = None
)]
pub struct CliArgs {
    /// Path of the unix socket the dispatcher listens on.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_SOCKET_PATH)]
    pub socket: PathBuf,

    /// Interpreter used to run the console script.
    #[arg(long = "php", value_name = "PATH", default_value = DEFAULT_INTERPRETER)]
    pub interpreter: PathBuf,

    /// Console script passed as first argument to the interpreter.
    #[arg(long, value_name = "PATH", default_value = DEFAULT_CONSOLE)]
    pub console: PathBuf,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `INVOKER_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Run a single component instead of both.
    #[arg(long, value_enum, value_name = "COMPONENT")]
    pub only: Option<Component>,

    /// Validate settings, print the scheduled jobs, but don't run anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Which part of the service to start.
#[derive(Debug, Copy, Clone, PartialEq, Eq, ValueEnum)]
pub enum Component {
    /// Time-triggered jobs only.
    Scheduler,
    /// Socket dispatcher only.
    Dispatcher,
}

impl CliArgs {
    pub fn runs_scheduler(&self) -> bool {
        self.only != Some(Component::Dispatcher)
    }

    pub fn runs_dispatcher(&self) -> bool {
        self.only != Some(Component::Scheduler)
    }
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
