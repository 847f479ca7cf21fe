//! Logging abstractions for runtime-agnostic logging

mod memory;
mod noop;
mod tracing_logger;
mod traits;

pub use memory::{LogLevel, MemoryLogger};
pub use noop::NoOpLogger;
pub use tracing_logger::TracingLogger;
pub use traits::{Logger, SharedLogger};
