//! Conversation state owned by the orchestrator

mod history;

pub use history::{Conversation, DEFAULT_SYSTEM_PROMPT};
