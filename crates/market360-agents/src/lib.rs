pub mod client;
pub mod error;
pub mod insight;
pub mod openrouter;
pub mod orchestrator;
pub mod prompts;

pub mod test_support;

pub use client::CompletionClient;
pub use error::AgentError;
pub use insight::extract_insight;
pub use openrouter::OpenRouterClient;
pub use orchestrator::{normalize_model, Orchestrator};
