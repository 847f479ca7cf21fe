//! Core types shared across the crate
//!
//! Conversation turns, tool definitions and calls, and backend descriptors.

mod backend;
mod message;
mod tool;

pub use backend::{BackendDescriptor, BackendKind, BackendTransport};
pub use message::{ChatMessage, ContentPart, MessageContent, MessageRole};
pub use tool::{Tool, ToolCall, ToolChoice, ToolContent, ToolOutput};
