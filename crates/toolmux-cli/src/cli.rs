//! CLI argument definitions

use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for toolmux
#[derive(Parser, Debug)]
#[command(name = "toolmux")]
#[command(author, version, about = "Chat with a model that can call tools on several MCP servers")]
#[command(long_about = r#"
toolmux connects to every enabled MCP server in its configuration, offers
their tools to a chat model under <server>__<tool> names, and routes the
model's tool calls back to the right server.

Configuration is loaded from (in priority order):
1. --config <path>                        Explicit config file
2. ./.config/toolmux/config.yaml          Workspace config
3. ~/.config/toolmux/config.yaml          User config

The model endpoint is read from LLM_API_KEY, LLM_BASE_URL and LLM_MODEL
(a .env file in the working directory is also consulted).

At the prompt, type a query, `clear` to reset the conversation, or `quit`
to exit.
"#)]
pub struct Cli {
    /// Path to configuration file
    #[arg(short, long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Override the model name
    #[arg(short, long, value_name = "MODEL")]
    pub model: Option<String>,

    /// Override the system prompt
    #[arg(long, value_name = "TEXT")]
    pub system_prompt: Option<String>,

    /// Read settings from this dotenv file instead of ./.env
    #[arg(long, value_name = "PATH")]
    pub env_file: Option<PathBuf>,

    /// Verbosity level (-v = info, -vv = debug, -vvv = trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
