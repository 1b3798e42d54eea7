#![allow(dead_code)]

pub use invoker_test_utils::builders;
pub use invoker_test_utils::fake_runner;
pub use invoker_test_utils::{init_tracing, with_timeout};
