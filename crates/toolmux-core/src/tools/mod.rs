//! Tool naming, aggregation and dispatch across backends

mod qualified;
mod registry;

pub use qualified::{
    validate_backend_name, validate_tool_name, NameError, QualifiedToolName, SEPARATOR,
};
pub use registry::{CatalogEntry, DispatchError, RegistryError, SessionRegistry, ToolError};
