use async_trait::async_trait;
use market360_models::CompletionRequest;

use crate::error::AgentError;

/// Anything that turns one completion request into completion text.
/// Mockable for testing.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, AgentError>;
}
