// src/dispatch/listener.rs

//! Socket setup and the accept loop.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::UnixListener;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;
use tracing::{debug, info, warn};

use crate::config::Settings;
use crate::errors::{InvokerError, Result};
use crate::exec::ExecutionSerializer;

use super::connection::{DispatchContext, handle_connection};

/// A bound dispatcher, ready to accept connections.
#[derive(Debug)]
pub struct Dispatcher {
    listener: UnixListener,
    socket_path: PathBuf,
    ctx: DispatchContext,
    accept_backoff: Duration,
    connections: TaskTracker,
}

impl Dispatcher {
    /// Remove any stale socket at the configured path and bind a fresh one.
    ///
    /// Both steps are fatal on failure: the caller should exit without
    /// serving.
    pub fn bind(
        settings: &Settings,
        serializer: Arc<ExecutionSerializer>,
        cancel: CancellationToken,
    ) -> Result<Self> {
        let socket_path = settings.socket_path.clone();
        remove_stale_socket(&socket_path)?;

        let listener = UnixListener::bind(&socket_path).map_err(|source| InvokerError::Bind {
            path: socket_path.clone(),
            source,
        })?;
        info!(path = %socket_path.display(), "listening");

        Ok(Self {
            listener,
            socket_path,
            ctx: DispatchContext {
                secret: Arc::new(settings.secret.clone()),
                serializer,
                cancel,
            },
            accept_backoff: settings.accept_backoff,
            connections: TaskTracker::new(),
        })
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    /// Accept connections until shutdown, then close the listener and wait
    /// for every in-flight connection handler to finish.
    pub async fn run(self) {
        let Dispatcher {
            listener,
            socket_path,
            ctx,
            accept_backoff,
            connections,
        } = self;

        loop {
            let accepted = tokio::select! {
                biased;
                _ = ctx.cancel.cancelled() => break,
                accepted = listener.accept() => accepted,
            };

            match accepted {
                Ok((stream, _addr)) => {
                    debug!("accepted connection");
                    let ctx = ctx.clone();
                    connections.spawn(async move {
                        handle_connection(stream, ctx).await;
                    });
                }
                Err(err) => {
                    warn!(error = %err, "error accepting connection");
                    let cancelled = tokio::select! {
                        _ = ctx.cancel.cancelled() => true,
                        _ = tokio::time::sleep(accept_backoff) => false,
                    };
                    if cancelled {
                        break;
                    }
                }
            }
        }

        drop(listener);
        info!("stop accepting connections");

        connections.close();
        connections.wait().await;
        info!("all connections handled");

        if let Err(err) = fs::remove_file(&socket_path) {
            debug!(path = %socket_path.display(), error = %err, "could not remove socket file");
        }
    }
}

/// Remove whatever is left at `path` from a previous run.
///
/// A missing path is fine; a directory is removed recursively.
pub fn remove_stale_socket(path: &Path) -> Result<()> {
    let removed = match fs::symlink_metadata(path) {
        Ok(meta) if meta.is_dir() => fs::remove_dir_all(path),
        Ok(_) => fs::remove_file(path),
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(()),
        Err(err) => Err(err),
    };

    removed.map_err(|source| InvokerError::SocketCleanup {
        path: path.to_path_buf(),
        source,
    })
}
