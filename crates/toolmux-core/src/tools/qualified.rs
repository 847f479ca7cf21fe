//! Qualified tool names: `<backend>__<tool>`
//!
//! The separator is reserved. Backend names may not contain it and may not
//! end with `_` (otherwise `a_` + `b` and `a` + `_b` would both join to
//! `a___b`). Tool names may not contain it. Under those rules the first
//! occurrence of the separator in a joined name always sits right after the
//! backend component, so `parse(join(b, t)) == (b, t)`.

use thiserror::Error;

/// Separator between backend and tool name
pub const SEPARATOR: &str = "__";

/// Violations of the qualified-name rules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NameError {
    #[error("backend name is empty")]
    EmptyBackend,

    #[error("tool name is empty")]
    EmptyTool,

    #[error("backend name '{0}' contains the reserved separator '__'")]
    BackendContainsSeparator(String),

    #[error("backend name '{0}' must not end with '_'")]
    BackendTrailingUnderscore(String),

    #[error("tool name '{0}' contains the reserved separator '__'")]
    ToolContainsSeparator(String),

    #[error("'{0}' is not a qualified tool name (expected <backend>__<tool>)")]
    MissingSeparator(String),
}

/// Check that a backend name can be used as a qualified-name prefix
pub fn validate_backend_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::EmptyBackend);
    }
    if name.contains(SEPARATOR) {
        return Err(NameError::BackendContainsSeparator(name.to_string()));
    }
    if name.ends_with('_') {
        return Err(NameError::BackendTrailingUnderscore(name.to_string()));
    }
    Ok(())
}

/// Check that a backend-local tool name can be qualified
pub fn validate_tool_name(name: &str) -> Result<(), NameError> {
    if name.is_empty() {
        return Err(NameError::EmptyTool);
    }
    if name.contains(SEPARATOR) {
        return Err(NameError::ToolContainsSeparator(name.to_string()));
    }
    Ok(())
}

/// A backend name paired with a backend-local tool name
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QualifiedToolName {
    backend: String,
    tool: String,
}

impl QualifiedToolName {
    /// Join a backend and tool name, enforcing the naming rules
    pub fn new(backend: impl Into<String>, tool: impl Into<String>) -> Result<Self, NameError> {
        let backend = backend.into();
        let tool = tool.into();
        validate_backend_name(&backend)?;
        validate_tool_name(&tool)?;
        Ok(Self { backend, tool })
    }

    /// Split a qualified name back into its components
    pub fn parse(qualified: &str) -> Result<Self, NameError> {
        let (backend, tool) = qualified
            .split_once(SEPARATOR)
            .ok_or_else(|| NameError::MissingSeparator(qualified.to_string()))?;
        Self::new(backend, tool)
    }

    /// The backend component
    pub fn backend(&self) -> &str {
        &self.backend
    }

    /// The backend-local tool component
    pub fn tool(&self) -> &str {
        &self.tool
    }
}

impl std::fmt::Display for QualifiedToolName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}{}", self.backend, SEPARATOR, self.tool)
    }
}

impl std::str::FromStr for QualifiedToolName {
    type Err = NameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_join_and_split() {
        let cases = [
            ("alpha", "lookup"),
            ("mongo-server", "find_documents"),
            ("a", "_private"),
            ("db_1", "query_"),
            ("x", "a_b_c"),
        ];

        for (backend, tool) in cases {
            let joined = QualifiedToolName::new(backend, tool).unwrap().to_string();
            let parsed = QualifiedToolName::parse(&joined).unwrap();
            assert_eq!(parsed.backend(), backend, "backend of {}", joined);
            assert_eq!(parsed.tool(), tool, "tool of {}", joined);
        }
    }

    #[test]
    fn test_wire_format() {
        let name = QualifiedToolName::new("alpha", "lookup").unwrap();
        assert_eq!(name.to_string(), "alpha__lookup");

        let parsed: QualifiedToolName = "b__ping".parse().unwrap();
        assert_eq!(parsed.backend(), "b");
        assert_eq!(parsed.tool(), "ping");
    }

    #[test]
    fn test_rejects_reserved_separator() {
        assert_eq!(
            QualifiedToolName::new("my__server", "ping"),
            Err(NameError::BackendContainsSeparator("my__server".to_string()))
        );
        assert_eq!(
            QualifiedToolName::new("server", "do__it"),
            Err(NameError::ToolContainsSeparator("do__it".to_string()))
        );
        assert_eq!(
            QualifiedToolName::new("server_", "ping"),
            Err(NameError::BackendTrailingUnderscore("server_".to_string()))
        );
    }

    #[test]
    fn test_parse_failures() {
        assert_eq!(
            QualifiedToolName::parse("lookup"),
            Err(NameError::MissingSeparator("lookup".to_string()))
        );
        assert_eq!(QualifiedToolName::parse("__lookup"), Err(NameError::EmptyBackend));
        assert_eq!(QualifiedToolName::parse("alpha__"), Err(NameError::EmptyTool));
        assert!(QualifiedToolName::parse("a__b__c").is_err());
    }
}
