// tests/graceful_shutdown.rs

mod common;
use crate::common::builders::{FixedClock, SettingsBuilder};
use crate::common::fake_runner::RecordingRunner;
use crate::common::{init_tracing, with_timeout};

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, AsyncReadExt, AsyncWriteExt, BufReader};
use tokio::net::UnixStream;

use invoker::dispatch::Dispatcher;
use invoker::engine::{Lifecycle, Runtime, RuntimeOptions};
use invoker::errors::InvokerError;
use invoker::exec::ExecutionSerializer;
use invoker::types::{Cadence, Job};

type TestResult = Result<(), Box<dyn Error>>;

#[tokio::test]
async fn in_flight_command_completes_and_response_is_delivered() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("invoker.sock");
    let settings = SettingsBuilder::new().socket_path(&path).secret("abc").build();

    let runner = RecordingRunner::new()
        .with_output("slow job done")
        .with_delay(Duration::from_millis(300));
    let probe = runner.probe();
    let serializer = Arc::new(ExecutionSerializer::new(runner));
    let lifecycle = Lifecycle::new();
    let dispatcher = Dispatcher::bind(&settings, serializer, lifecycle.cancel_token())?;
    let handle = tokio::spawn(dispatcher.run());

    let stream = UnixStream::connect(&path).await?;
    let (reader, mut writer) = stream.into_split();
    writer.write_all(b"abc|notifications:send\n").await?;

    with_timeout(probe.wait_for_started(1)).await;
    lifecycle.request_shutdown();
    tokio::time::sleep(Duration::from_millis(50)).await;

    // The listener is gone: new clients are refused.
    assert!(UnixStream::connect(&path).await.is_err());
    assert!(!handle.is_finished(), "dispatcher exited before the handler finished");

    let mut response = String::new();
    with_timeout(BufReader::new(reader).read_to_string(&mut response)).await?;
    assert_eq!(response, "output:\nslow job done\n");
    assert_eq!(probe.call_count(), 1);

    with_timeout(handle).await?;
    assert!(!path.exists(), "socket file should be removed after the drain");
    Ok(())
}

#[tokio::test]
async fn lines_already_received_are_answered_before_closing() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("invoker.sock");
    let settings = SettingsBuilder::new().socket_path(&path).secret("abc").build();

    let runner = RecordingRunner::new()
        .with_output("ok")
        .with_delay(Duration::from_millis(200));
    let probe = runner.probe();
    let serializer = Arc::new(ExecutionSerializer::new(runner));
    let lifecycle = Lifecycle::new();
    let dispatcher = Dispatcher::bind(&settings, serializer, lifecycle.cancel_token())?;
    let handle = tokio::spawn(dispatcher.run());

    let stream = UnixStream::connect(&path).await?;
    let (reader, mut writer) = stream.into_split();
    writer.write_all(b"abc|first\nabc|second\n").await?;

    with_timeout(probe.wait_for_started(1)).await;
    lifecycle.request_shutdown();

    let mut response = String::new();
    with_timeout(BufReader::new(reader).read_to_string(&mut response)).await?;
    assert_eq!(response, "output:\nok\noutput:\nok\n");

    let calls = probe.calls();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0].args, vec!["first"]);
    assert_eq!(calls[1].args, vec!["second"]);

    with_timeout(handle).await?;
    Ok(())
}

#[tokio::test]
async fn idle_connection_is_closed_on_shutdown() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("invoker.sock");
    let settings = SettingsBuilder::new().socket_path(&path).secret("abc").build();

    let serializer = Arc::new(ExecutionSerializer::new(RecordingRunner::new()));
    let lifecycle = Lifecycle::new();
    let dispatcher = Dispatcher::bind(&settings, serializer, lifecycle.cancel_token())?;
    let handle = tokio::spawn(dispatcher.run());

    let mut stream = UnixStream::connect(&path).await?;
    // Make sure the connection has been accepted before shutting down.
    stream.write_all(b"xyz|ignored\n").await?;
    tokio::time::sleep(Duration::from_millis(50)).await;

    lifecycle.request_shutdown();

    let mut buf = Vec::new();
    let read = with_timeout(stream.read_to_end(&mut buf)).await?;
    assert_eq!(read, 0);

    with_timeout(handle).await?;
    Ok(())
}

#[tokio::test]
async fn runtime_returns_after_shutdown_without_firing_jobs() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("invoker.sock");
    let settings = SettingsBuilder::new().socket_path(&path).secret("abc").build();

    let runner = RecordingRunner::new();
    let probe = runner.probe();
    let serializer = Arc::new(ExecutionSerializer::new(runner));
    let jobs = vec![Job::new(Cadence::Daily { hour: 13, minute: 37 }, ["notifications:tsbalance"])];
    let clock = Arc::new(FixedClock::at(2026, 10, 14, 9, 0, 0));
    let lifecycle = Lifecycle::new();

    let runtime = Runtime::new(
        settings,
        jobs,
        serializer,
        clock,
        lifecycle.clone(),
        RuntimeOptions::default(),
    );
    let handle = tokio::spawn(runtime.run());

    // Wait for the socket to show up, then use it once.
    with_timeout(async {
        while !path.exists() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;
    let stream = UnixStream::connect(&path).await?;
    let (reader, mut writer) = stream.into_split();
    writer.write_all(b"abc|idps:refresh\n").await?;
    let mut lines = BufReader::new(reader).lines();
    assert_eq!(with_timeout(lines.next_line()).await?.as_deref(), Some("output:"));

    lifecycle.request_shutdown();
    with_timeout(handle).await??;

    assert!(lifecycle.is_shutting_down());
    assert_eq!(lifecycle.in_flight(), 0);
    assert_eq!(probe.call_count(), 1, "only the dispatched command should have run");
    Ok(())
}

#[tokio::test]
async fn invalid_job_is_rejected_before_binding() {
    init_tracing();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("invoker.sock");
    let settings = SettingsBuilder::new().socket_path(&path).build();

    let serializer = Arc::new(ExecutionSerializer::new(RecordingRunner::new()));
    let jobs = vec![Job::new(Cadence::Daily { hour: 25, minute: 0 }, ["broken"])];
    let runtime = Runtime::new(
        settings,
        jobs,
        serializer,
        Arc::new(FixedClock::at(2026, 10, 14, 9, 0, 0)),
        Lifecycle::new(),
        RuntimeOptions::default(),
    );

    let result = with_timeout(runtime.run()).await;

    assert!(matches!(result, Err(InvokerError::ConfigError(_))));
    assert!(!path.exists());
}

#[tokio::test]
async fn dispatcher_only_runtime_ignores_jobs() -> TestResult {
    init_tracing();
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("invoker.sock");
    let settings = SettingsBuilder::new().socket_path(&path).build();

    let serializer = Arc::new(ExecutionSerializer::new(RecordingRunner::new()));
    // Would be rejected if the scheduler were enabled.
    let jobs = vec![Job::new(Cadence::Daily { hour: 25, minute: 0 }, ["broken"])];
    let lifecycle = Lifecycle::new();
    let runtime = Runtime::new(
        settings,
        jobs,
        serializer,
        Arc::new(FixedClock::at(2026, 10, 14, 9, 0, 0)),
        lifecycle.clone(),
        RuntimeOptions {
            run_scheduler: false,
            run_dispatcher: true,
        },
    );
    let handle = tokio::spawn(runtime.run());

    with_timeout(async {
        while !path.exists() {
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
    })
    .await;

    lifecycle.request_shutdown();
    with_timeout(handle).await??;
    Ok(())
}
