use async_trait::async_trait;
use std::fmt::Debug;

use super::ChatRequest;
use crate::domain::DomainError;

/// Chat capability of a provider client (Zhipu, OpenAI-compatible, Ollama, ...)
#[async_trait]
pub trait ChatClient: Send + Sync + Debug {
    /// Send a chat completion request and return the assistant text
    async fn chat(&self, request: ChatRequest) -> Result<String, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Model used for text-only requests
    fn chat_model(&self) -> &str;
}
