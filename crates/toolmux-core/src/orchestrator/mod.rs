//! Top-level query loop, startup and shutdown

mod engine;
mod error;
mod input;

pub use engine::{ConnectedBackend, FailedBackend, Orchestrator, StartupReport};
pub use error::{OrchestratorError, OrchestratorResult};
pub use input::ControlInput;
