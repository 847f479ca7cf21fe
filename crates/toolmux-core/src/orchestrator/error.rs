//! Orchestrator errors

use thiserror::Error;

use crate::providers::ProviderError;

/// Failures surfaced to the caller of the orchestrator
#[derive(Error, Debug)]
pub enum OrchestratorError {
    #[error("No server connected ({attempted} enabled, all failed)")]
    NoBackendsConnected { attempted: usize },

    #[error("Not connected to any server")]
    NoActiveSessions,

    #[error("Model request failed: {0}")]
    Gateway(#[from] ProviderError),
}

pub type OrchestratorResult<T> = Result<T, OrchestratorError>;
