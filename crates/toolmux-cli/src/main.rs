//! CLI entrypoint for toolmux
//!
//! Wires configuration, the model gateway and the MCP connector into an
//! `Orchestrator`, then runs an interactive loop over stdin. Sessions are
//! closed on every exit path.

mod cli;

use std::io::Write;
use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

use toolmux_core::config::{ConfigProvider, FileConfigProvider, ModelSettings};
use toolmux_core::logging::{SharedLogger, TracingLogger};
use toolmux_core::mcp::McpConnector;
use toolmux_core::orchestrator::{ControlInput, Orchestrator};
use toolmux_core::providers::{GenaiGateway, ProviderModelConfig};
use toolmux_core::secrets::EnvSecretStore;

use crate::cli::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging based on verbosity level; RUST_LOG wins if set
    let level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    info!("Starting toolmux");

    let provider = config_provider(cli.config.as_deref())?;
    info!("Using {} config at {}", provider.level().as_str(), provider.path().display());

    let config = provider
        .load()
        .await
        .with_context(|| format!("loading {}", provider.path().display()))?;
    let backends = provider.enabled_backends().await?;

    let store = match &cli.env_file {
        Some(path) => EnvSecretStore::with_dotenv_file(path),
        None => EnvSecretStore::with_dotenv(),
    };
    let mut settings = ModelSettings::resolve(&store, config.model.as_ref())?;
    if let Some(model) = &cli.model {
        settings = settings.with_model(model.clone());
    }

    // === Dependency Injection ===
    let logger: SharedLogger = Arc::new(TracingLogger::new());
    let gateway = Arc::new(GenaiGateway::new(settings.provider.clone(), logger.clone()));
    let connector = Arc::new(McpConnector::new(logger.clone()));

    let mut orchestrator = Orchestrator::new(
        connector,
        gateway,
        ProviderModelConfig::from(&settings),
        logger,
    );
    if let Some(prompt) = cli.system_prompt.clone().or(config.system_prompt) {
        orchestrator = orchestrator.with_system_prompt(prompt);
    }

    println!(
        "Connecting to servers: {}",
        backends
            .iter()
            .map(|b| b.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    );

    let report = match orchestrator.connect_all(&backends).await {
        Ok(report) => report,
        Err(e) => {
            orchestrator.shutdown().await;
            bail!("{}", e);
        }
    };

    for backend in &report.connected {
        println!(
            "Connected to server '{}' with tools: {:?}",
            backend.name, backend.tools
        );
    }
    for backend in &report.failed {
        eprintln!("Failed to connect to server '{}': {}", backend.name, backend.error);
    }

    let result = run(&mut orchestrator).await;
    orchestrator.shutdown().await;
    result
}

/// Pick the explicit, workspace or user config, in that order
fn config_provider(explicit: Option<&Path>) -> Result<FileConfigProvider> {
    if let Some(path) = explicit {
        let provider = FileConfigProvider::at(path);
        if !provider.exists() {
            bail!("config file not found: {}", path.display());
        }
        return Ok(provider);
    }

    let workspace = FileConfigProvider::workspace(std::env::current_dir()?);
    if workspace.exists() {
        return Ok(workspace);
    }
    Ok(FileConfigProvider::user())
}

/// Read queries until `quit`, end of input or Ctrl-C
async fn run(orchestrator: &mut Orchestrator) -> Result<()> {
    println!();
    println!("toolmux started.");
    println!("Type your query, 'clear' to reset the conversation, or 'quit' to exit.");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("\nQuery: ");
        std::io::stdout().flush()?;

        let line = tokio::select! {
            line = lines.next_line() => line?,
            _ = tokio::signal::ctrl_c() => {
                println!();
                None
            }
        };
        let Some(line) = line else {
            break;
        };

        match ControlInput::parse(&line) {
            ControlInput::Quit => break,
            ControlInput::Empty => continue,
            ControlInput::Clear => {
                orchestrator.clear_history();
                println!("Conversation history cleared.");
            }
            ControlInput::Query(query) => match orchestrator.process_query(&query).await {
                Ok(reply) => println!("\n{}", reply),
                Err(e) => eprintln!("\nError: {}", e),
            },
        }
    }

    Ok(())
}
