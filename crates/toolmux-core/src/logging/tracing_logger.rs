//! Logger backed by the `tracing` crate
//!
//! The host installs a subscriber (the CLI uses `tracing-subscriber`); this
//! adapter only forwards messages at the matching level.

use super::traits::Logger;

/// Forwards log lines to `tracing` under the `toolmux` target
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingLogger;

impl TracingLogger {
    /// Create a new tracing logger
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn debug(&self, message: &str) {
        tracing::debug!(target: "toolmux", "{}", message);
    }

    fn info(&self, message: &str) {
        tracing::info!(target: "toolmux", "{}", message);
    }

    fn warn(&self, message: &str) {
        tracing::warn!(target: "toolmux", "{}", message);
    }

    fn error(&self, message: &str) {
        tracing::error!(target: "toolmux", "{}", message);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tracing_logger_without_subscriber() {
        // No subscriber installed: events are dropped silently
        let logger = TracingLogger::new();
        logger.debug("debug message");
        logger.info("info message");
        logger.warn("warn message");
        logger.error("error message");
    }
}
