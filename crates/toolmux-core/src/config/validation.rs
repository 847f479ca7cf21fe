//! Backend descriptor validation

use std::collections::HashSet;

use crate::tools::validate_backend_name;
use crate::types::{BackendDescriptor, BackendTransport};
use super::traits::{ConfigError, ConfigResult};

/// Check names and kind-specific parameters of every descriptor
///
/// Names must be unique and usable as qualified tool name prefixes.
pub fn validate_backends(backends: &[BackendDescriptor]) -> ConfigResult<()> {
    let mut seen = HashSet::new();
    for backend in backends {
        validate_backend(backend)?;
        if !seen.insert(backend.name.as_str()) {
            return Err(ConfigError::DuplicateBackend(backend.name.clone()));
        }
    }
    Ok(())
}

/// Check a single descriptor
pub fn validate_backend(backend: &BackendDescriptor) -> ConfigResult<()> {
    validate_backend_name(&backend.name)
        .map_err(|e| ConfigError::invalid_backend(&backend.name, e.to_string()))?;

    match &backend.transport {
        BackendTransport::Command { command, .. } if command.trim().is_empty() => Err(
            ConfigError::invalid_backend(&backend.name, "command backend requires a command"),
        ),
        BackendTransport::Stream { url } if url.trim().is_empty() => Err(
            ConfigError::invalid_backend(&backend.name, "stream backend requires a url"),
        ),
        BackendTransport::Unix { path } if path.as_os_str().is_empty() => Err(
            ConfigError::invalid_backend(&backend.name, "unix backend requires a path"),
        ),
        _ => Ok(()),
    }
}
