//! Secret and setting lookup
//!
//! - `SecretStore` trait for read-only lookup by key
//! - `EnvSecretStore` over the process environment (plus optional `.env`)
//! - `MemorySecretStore` for tests and embedding hosts

mod env_store;
mod memory_store;
mod traits;

pub use env_store::EnvSecretStore;
pub use memory_store::MemorySecretStore;
pub use traits::SecretStore;
