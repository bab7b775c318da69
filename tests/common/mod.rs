#![allow(dead_code)]

pub use taskflow_test_utils::builders;
pub use taskflow_test_utils::recording_executor;
pub use taskflow_test_utils::{eventually, init_tracing, with_timeout};
