// src/exec/task_runner.rs

//! Individual process runner.

use std::ffi::OsString;
use std::io;
use std::os::unix::process::ExitStatusExt;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::time::Instant;

use tokio::io::{AsyncRead, AsyncReadExt};
use tokio::process::Command;
use tokio::sync::mpsc;
use tracing::{debug, trace};

use crate::errors::RunError;

use super::backend::{ExecutionOutcome, ExecutionResult};

const READ_CHUNK: usize = 8 * 1024;

/// Run `program` with `args`, wait for it to exit, and capture stdout and
/// stderr into one buffer in the order chunks arrive.
///
/// A process that cannot be started or exits non-zero yields a
/// [`ExecutionOutcome::Failed`]; whatever output was captured is kept.
pub async fn run_command(program: &Path, args: &[OsString]) -> ExecutionResult {
    let started = Instant::now();
    let mut output = Vec::new();

    let outcome = match run_inner(program, args, &mut output).await {
        Ok(()) => ExecutionOutcome::Success,
        Err(err) => ExecutionOutcome::Failed(err),
    };

    ExecutionResult {
        output,
        elapsed: started.elapsed(),
        outcome,
    }
}

async fn run_inner(
    program: &Path,
    args: &[OsString],
    output: &mut Vec<u8>,
) -> Result<(), RunError> {
    debug!(program = %program.display(), ?args, "starting process");

    let mut cmd = Command::new(program);
    cmd.args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = cmd.spawn().map_err(|source| RunError::Spawn {
        program: program.display().to_string(),
        source,
    })?;

    // Both pipes feed one channel so the buffer keeps arrival order.
    let (tx, mut rx) = mpsc::unbounded_channel::<io::Result<Vec<u8>>>();
    if let Some(stdout) = child.stdout.take() {
        spawn_pipe_reader(stdout, tx.clone());
    }
    if let Some(stderr) = child.stderr.take() {
        spawn_pipe_reader(stderr, tx.clone());
    }
    drop(tx);

    while let Some(chunk) = rx.recv().await {
        output.extend_from_slice(&chunk.map_err(RunError::Output)?);
    }

    let status = child.wait().await.map_err(RunError::Output)?;
    trace!(program = %program.display(), %status, "process exited");
    check_status(status)
}

fn spawn_pipe_reader<R>(mut pipe: R, tx: mpsc::UnboundedSender<io::Result<Vec<u8>>>)
where
    R: AsyncRead + Unpin + Send + 'static,
{
    tokio::spawn(async move {
        loop {
            let mut buf = vec![0u8; READ_CHUNK];
            match pipe.read(&mut buf).await {
                Ok(0) => break,
                Ok(n) => {
                    buf.truncate(n);
                    if tx.send(Ok(buf)).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    let _ = tx.send(Err(err));
                    break;
                }
            }
        }
    });
}

fn check_status(status: ExitStatus) -> Result<(), RunError> {
    if status.success() {
        return Ok(());
    }
    if let Some(code) = status.code() {
        return Err(RunError::Exit(code));
    }
    match status.signal() {
        Some(signal) => Err(RunError::Signal(signal)),
        None => Err(RunError::Exit(-1)),
    }
}
