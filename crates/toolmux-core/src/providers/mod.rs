//! Model gateway implementations
//!
//! `GenaiGateway` uses the `genai` crate, which handles provider protocols
//! and tool calling. Providers not native to genai (Azure, OpenRouter,
//! Mistral, any OpenAI-compatible server) are reached through genai's
//! `ServiceTargetResolver` with the configured base URL.
//!
//! `MockGateway` replays scripted completions for tests.

mod error;
mod genai_adapter;
mod genai_provider;
mod mock;
mod traits;

pub use error::{ProviderError, ProviderResult};
pub use genai_adapter::{is_openai_compatible, ProviderConfig};
pub use genai_provider::GenaiGateway;
pub use mock::{MockGateway, RecordedRequest};
pub use traits::{ChatOptions, Choice, Completion, ModelGateway, ProviderModelConfig};
