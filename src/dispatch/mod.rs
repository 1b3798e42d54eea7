// src/dispatch/mod.rs

//! On-demand command dispatcher over a unix socket.
//!
//! Wire protocol (newline-delimited UTF-8):
//!
//! ```text
//! request:  <secret>|<command> <arg1> ... <argN>
//! response: error executing command: <description>\n
//!       or  output:\n<combined process output>\n
//! ```
//!
//! Lines with a missing separator or a wrong secret are dropped without a
//! response and the connection stays open. A line over
//! [`MAX_LINE_LENGTH`] bytes ends the connection.

pub mod connection;
pub mod listener;
pub mod request;

pub use connection::{DispatchContext, MAX_LINE_LENGTH, handle_connection};
pub use listener::{Dispatcher, remove_stale_socket};
pub use request::{Rejection, Request, parse_request, render_response, split_argv};
