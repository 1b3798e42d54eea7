// src/errors.rs

//! Crate-wide error types.
//!
//! - [`InvokerError`] covers startup and wiring failures (settings, socket
//!   setup, IO). Anything returned from here before serving is fatal.
//! - [`RunError`] describes why a single external command invocation did not
//!   succeed. It is a value carried inside an execution result, never
//!   propagated with `?` through the scheduler or dispatcher loops.

use std::borrow::Cow;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum InvokerError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] io::Error),

    #[error("error removing existing socket {path:?}: {source}")]
    SocketCleanup {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("error listening on unix socket {path:?}: {source}")]
    Bind {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Failure of one external command invocation.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: io::Error,
    },

    #[error("reading process output: {0}")]
    Output(#[source] io::Error),

    #[error("exit status {0}")]
    Exit(i32),

    #[error("signal: {}", describe_signal(.0))]
    Signal(i32),
}

fn describe_signal(signal: &i32) -> Cow<'static, str> {
    signal_name(*signal)
}

/// Conventional description of a Linux signal number, as shells print it.
pub fn signal_name(signal: i32) -> Cow<'static, str> {
    let name = match signal {
        1 => "hangup",
        2 => "interrupt",
        3 => "quit",
        4 => "illegal instruction",
        5 => "trace/breakpoint trap",
        6 => "aborted",
        7 => "bus error",
        8 => "floating point exception",
        9 => "killed",
        10 => "user defined signal 1",
        11 => "segmentation fault",
        12 => "user defined signal 2",
        13 => "broken pipe",
        14 => "alarm clock",
        15 => "terminated",
        other => return Cow::Owned(format!("signal {other}")),
    };
    Cow::Borrowed(name)
}

pub type Result<T> = std::result::Result<T, InvokerError>;
