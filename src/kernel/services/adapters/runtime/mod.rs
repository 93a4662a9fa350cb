//! Tokio runtime owned by the binary.

mod async_runtime;

pub use async_runtime::AsyncRuntime;
