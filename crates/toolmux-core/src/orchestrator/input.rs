//! Interactive control input

/// One line of operator input, classified
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlInput {
    /// Terminate the session
    Quit,
    /// Reset the conversation history
    Clear,
    /// Blank line; ignored
    Empty,
    /// A query for the model (trimmed)
    Query(String),
}

impl ControlInput {
    /// Classify a line; control words match case-insensitively
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            ControlInput::Empty
        } else if trimmed.eq_ignore_ascii_case("quit") {
            ControlInput::Quit
        } else if trimmed.eq_ignore_ascii_case("clear") {
            ControlInput::Clear
        } else {
            ControlInput::Query(trimmed.to_string())
        }
    }
}
