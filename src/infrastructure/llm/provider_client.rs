use async_trait::async_trait;

use super::echo::EchoProvider;
use super::openai_compatible::OpenAiCompatibleProvider;
use super::provider_config::ProviderKind;
use super::zhipu::ZhipuProvider;
use crate::domain::{ChatClient, ChatRequest, DomainError, EmbeddingClient, EmbeddingVector};

/// One chat + embedding client, whichever provider backs it
#[derive(Debug, Clone)]
pub enum ProviderClient {
    /// Provider with its own fixed API contract (Zhipu)
    ReferenceSdk(ZhipuProvider),
    /// Generic OpenAI-compatible server with endpoint probing
    HttpCompatible(OpenAiCompatibleProvider),
    /// Local inference server; same wire contract, local defaults
    Local(OpenAiCompatibleProvider),
    /// Deterministic offline client
    Test(EchoProvider),
}

impl ProviderClient {
    pub fn kind(&self) -> ProviderKind {
        match self {
            Self::ReferenceSdk(_) => ProviderKind::Zhipu,
            Self::HttpCompatible(_) => ProviderKind::OpenAiCompatible,
            Self::Local(_) => ProviderKind::Ollama,
            Self::Test(_) => ProviderKind::Mock,
        }
    }

    fn chat_client(&self) -> &dyn ChatClient {
        match self {
            Self::ReferenceSdk(provider) => provider,
            Self::HttpCompatible(provider) | Self::Local(provider) => provider,
            Self::Test(provider) => provider,
        }
    }

    fn embedding_client(&self) -> &dyn EmbeddingClient {
        match self {
            Self::ReferenceSdk(provider) => provider,
            Self::HttpCompatible(provider) | Self::Local(provider) => provider,
            Self::Test(provider) => provider,
        }
    }
}

#[async_trait]
impl ChatClient for ProviderClient {
    async fn chat(&self, request: ChatRequest) -> Result<String, DomainError> {
        self.chat_client().chat(request).await
    }

    fn provider_name(&self) -> &'static str {
        self.kind().name()
    }

    fn chat_model(&self) -> &str {
        self.chat_client().chat_model()
    }
}

#[async_trait]
impl EmbeddingClient for ProviderClient {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
        self.embedding_client().embed(text).await
    }

    fn provider_name(&self) -> &'static str {
        self.kind().name()
    }

    fn embedding_model(&self) -> &str {
        self.embedding_client().embedding_model()
    }
}
