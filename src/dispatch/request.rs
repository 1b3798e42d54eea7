// src/dispatch/request.rs

use std::fmt;

use crate::config::SharedSecret;
use crate::exec::{ExecutionOutcome, ExecutionResult};

/// Separator between the secret and the command text.
pub const SEPARATOR: char = '|';

/// Why an inbound line was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    MissingSeparator,
    SecretMismatch,
}

impl fmt::Display for Rejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rejection::MissingSeparator => f.write_str("missing PSK separator"),
            Rejection::SecretMismatch => f.write_str("invalid PSK"),
        }
    }
}

/// An authenticated request, borrowed from the line it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request<'a> {
    /// Command text after the separator, as received.
    pub command: &'a str,
    /// `command` split on whitespace.
    pub argv: Vec<String>,
}

/// Authenticate `line` and split it into console arguments.
///
/// The line is cut at the first `|`; everything before it must equal the
/// shared secret exactly. Argument parsing only happens after that check.
pub fn parse_request<'a>(line: &'a str, secret: &SharedSecret) -> Result<Request<'a>, Rejection> {
    let (prefix, command) = line
        .split_once(SEPARATOR)
        .ok_or(Rejection::MissingSeparator)?;

    if !secret.matches(prefix) {
        return Err(Rejection::SecretMismatch);
    }

    Ok(Request {
        command,
        argv: split_argv(command),
    })
}

/// Split command text into arguments on runs of whitespace.
pub fn split_argv(command: &str) -> Vec<String> {
    command.split_whitespace().map(str::to_owned).collect()
}

/// Bytes written back to the client for one executed request.
pub fn render_response(result: &ExecutionResult) -> Vec<u8> {
    match &result.outcome {
        ExecutionOutcome::Failed(err) => format!("error executing command: {err}\n").into_bytes(),
        ExecutionOutcome::Success => {
            let mut buf = Vec::with_capacity(result.output.len() + 9);
            buf.extend_from_slice(b"output:\n");
            buf.extend_from_slice(&result.output);
            buf.push(b'\n');
            buf
        }
    }
}
