// src/dispatch/connection.rs

//! Per-connection request handling.

use std::io;
use std::sync::Arc;
use std::time::Instant;

use futures_util::StreamExt;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};
use tokio_util::codec::{FramedRead, LinesCodec};
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};

use crate::config::SharedSecret;
use crate::exec::ExecutionSerializer;
use crate::logging::format_elapsed;

use super::request::{parse_request, render_response};

/// Everything a connection handler needs, cloned once per connection.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub secret: Arc<SharedSecret>,
    pub serializer: Arc<ExecutionSerializer>,
    pub cancel: CancellationToken,
}

/// Longest request line accepted, newline excluded.
pub const MAX_LINE_LENGTH: usize = 64 * 1024;

/// Serve one client until it hangs up, a read fails, or shutdown is
/// requested while the handler is idle.
///
/// Lines are handled strictly in order. A command that is already running
/// when shutdown is requested still completes and its response is written
/// before the handler returns, and so does every complete line that was
/// already read off the connection.
pub async fn handle_connection<S>(stream: S, ctx: DispatchContext)
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let (reader, mut writer) = tokio::io::split(stream);
    let mut lines = FramedRead::new(reader, LinesCodec::new_with_max_length(MAX_LINE_LENGTH));

    loop {
        let next = if has_buffered_line(lines.read_buffer()) {
            lines.next().await
        } else {
            tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => {
                    debug!("shutdown requested; closing idle connection");
                    break;
                }
                next = lines.next() => next,
            }
        };

        match next {
            Some(Ok(line)) => {
                if let Err(err) = handle_line(&line, &ctx, &mut writer).await {
                    warn!(error = %err, "error writing response; closing connection");
                    break;
                }
            }
            None => {
                debug!("client closed connection");
                break;
            }
            Some(Err(err)) => {
                error!(error = %err, "error reading from connection");
                break;
            }
        }
    }

    if let Err(err) = writer.shutdown().await {
        debug!(error = %err, "error closing connection");
    }
}

fn has_buffered_line(buffered: &[u8]) -> bool {
    buffered.contains(&b'\n')
}

async fn handle_line<W>(line: &str, ctx: &DispatchContext, writer: &mut W) -> io::Result<()>
where
    W: AsyncWrite + Unpin,
{
    let request = match parse_request(line, &ctx.secret) {
        Ok(request) => request,
        Err(rejection) => {
            warn!(reason = %rejection, "invalid or missing PSK; dropping line");
            return Ok(());
        }
    };

    info!(cmd = %request.command, "received command");

    // Measured from before the gate so queueing time shows up in the log.
    let started = Instant::now();
    let result = ctx.serializer.execute(&request.argv).await;
    info!(
        cmd = %request.command,
        elapsed = %format_elapsed(started.elapsed()),
        success = result.is_success(),
        "finished processing"
    );

    writer.write_all(&render_response(&result)).await?;
    writer.flush().await
}
