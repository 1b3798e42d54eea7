// src/config/mod.rs

//! Startup settings for invoker.
//!
//! Responsibilities:
//! - Define the settings model and the shared secret (`model.rs`).
//! - Assemble raw settings from CLI arguments and the environment (`loader.rs`).
//! - Validate basic invariants before anything is bound or spawned (`validate.rs`).
//!
//! There is no configuration file: everything is fixed in code, overridable
//! through a handful of CLI flags, plus the secret from `INVOKER_PSK`.

pub mod loader;
pub mod model;
pub mod validate;

pub use loader::{load_settings, raw_settings_from_args};
pub use model::{RawSettings, Settings, SharedSecret};
pub use validate::validate_settings;
