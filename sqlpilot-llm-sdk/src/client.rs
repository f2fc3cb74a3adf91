use crate::{
    error::LlmError,
    types::{CompletionRequest, CompletionResponse},
};
use async_trait::async_trait;

/// Core trait for text-completion clients
#[async_trait]
pub trait LlmClient: Send + Sync {
    /// Complete a raw prompt (non-streaming)
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError>;

    /// Get provider name (e.g., "llama_cpp", "ollama")
    fn provider_name(&self) -> &str;

    /// Get model name the client was configured with
    fn model_name(&self) -> &str;
}
