//! Ordered conversation log

use crate::types::{ChatMessage, MessageRole};

/// System instruction used when none is configured
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are an AI assistant that can help users access \
various databases and tools. Remember our conversation as well as you can and take the \
previous conversation history into account when answering.";

/// The exact turn sequence sent to the model on every round
///
/// Always starts with one `system` turn. Turns are only ever appended;
/// `reset` is the only way to drop them.
#[derive(Debug, Clone, PartialEq)]
pub struct Conversation {
    system_prompt: String,
    messages: Vec<ChatMessage>,
}

impl Conversation {
    /// Start a conversation with the given system instruction
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt = system_prompt.into();
        Self {
            messages: vec![ChatMessage::system(system_prompt.clone())],
            system_prompt,
        }
    }

    /// Append a turn
    pub fn append(&mut self, message: ChatMessage) {
        self.messages.push(message);
    }

    /// All turns, in order
    pub fn snapshot(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Drop everything except a fresh system turn
    pub fn reset(&mut self) {
        self.messages.clear();
        self.messages.push(ChatMessage::system(self.system_prompt.clone()));
    }

    /// The system instruction
    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Number of turns with the given role
    pub fn count(&self, role: MessageRole) -> usize {
        self.messages.iter().filter(|m| m.role == role).count()
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    /// True when only the system turn is present
    pub fn is_empty(&self) -> bool {
        self.messages.len() <= 1
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new(DEFAULT_SYSTEM_PROMPT)
    }
}
