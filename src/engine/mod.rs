// src/engine/mod.rs

//! Process lifecycle and wiring.
//!
//! - [`lifecycle`] holds the process-wide cancellation signal, the tracker
//!   of spawned tasks used for the graceful drain, and signal handling.
//! - [`runtime`] builds the scheduler and dispatcher around one shared
//!   execution serializer and runs them until shutdown.

/// Which components a runtime starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RuntimeOptions {
    pub run_scheduler: bool,
    pub run_dispatcher: bool,
}

impl Default for RuntimeOptions {
    fn default() -> Self {
        Self {
            run_scheduler: true,
            run_dispatcher: true,
        }
    }
}

pub mod lifecycle;
pub mod runtime;

pub use lifecycle::Lifecycle;
pub use runtime::Runtime;
