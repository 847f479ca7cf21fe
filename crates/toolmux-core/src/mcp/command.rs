//! Child process preparation for command backends

use std::collections::BTreeMap;
use std::path::Path;

use tokio::process::Command;

use super::error::{McpError, McpResult};

/// Program, arguments and extra environment for a command backend
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedCommand {
    pub program: String,
    pub args: Vec<String>,
    pub env: BTreeMap<String, String>,
}

impl PreparedCommand {
    /// Split a command line on whitespace and append extra arguments
    ///
    /// Arguments starting with `~/` are expanded against the home directory.
    pub fn parse(
        command_line: &str,
        extra_args: &[String],
        env: &BTreeMap<String, String>,
    ) -> McpResult<Self> {
        let home = dirs::home_dir();
        let mut parts = command_line
            .split_whitespace()
            .chain(extra_args.iter().map(String::as_str))
            .map(|part| expand_home(part, home.as_deref()));

        let program = parts
            .next()
            .ok_or_else(|| McpError::ConnectionFailed("empty command line".to_string()))?;

        Ok(Self {
            program,
            args: parts.collect(),
            env: env.clone(),
        })
    }

    /// Build the tokio command; the child inherits this process's environment
    pub fn to_command(&self) -> Command {
        let mut command = Command::new(&self.program);
        command.args(&self.args).envs(&self.env);
        command
    }
}

/// Expand a leading `~/` to `home`
pub fn expand_home(arg: &str, home: Option<&Path>) -> String {
    match (arg.strip_prefix("~/"), home) {
        (Some(rest), Some(home)) => home.join(rest).to_string_lossy().into_owned(),
        _ => arg.to_string(),
    }
}
