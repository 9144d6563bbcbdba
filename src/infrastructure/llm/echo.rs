use async_trait::async_trait;

use super::provider_config::ProviderConfig;
use crate::domain::{ChatClient, ChatRequest, DomainError, EmbeddingClient, EmbeddingVector};

/// Value of every component of the echo embedding
pub const ECHO_EMBEDDING_VALUE: f32 = 0.1;

/// Offline provider for tests and demos.
///
/// Never touches the network: chat echoes the last message, embeddings are a
/// constant vector of the configured dimensionality.
#[derive(Debug, Clone)]
pub struct EchoProvider {
    chat_model: String,
    embedding_model: String,
    dimensions: usize,
}

impl EchoProvider {
    pub fn new(config: &ProviderConfig) -> Self {
        Self {
            chat_model: config.chat_model.clone(),
            embedding_model: config.embedding_model.clone(),
            dimensions: config.embedding_dimensions,
        }
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }
}

#[async_trait]
impl ChatClient for EchoProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, DomainError> {
        let last = request.last_message_text().unwrap_or_default();

        Ok(format!(
            "This is a mock response from {}. Your last message was: {}",
            self.chat_model, last
        ))
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn chat_model(&self) -> &str {
        &self.chat_model
    }
}

#[async_trait]
impl EmbeddingClient for EchoProvider {
    async fn embed(&self, _text: &str) -> Result<EmbeddingVector, DomainError> {
        Ok(vec![ECHO_EMBEDDING_VALUE; self.dimensions])
    }

    fn provider_name(&self) -> &'static str {
        "mock"
    }

    fn embedding_model(&self) -> &str {
        &self.embedding_model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::llm::provider_config::ProviderKind;

    #[tokio::test]
    async fn test_chat_echoes_last_message() {
        let provider = EchoProvider::new(&ProviderConfig::defaults(ProviderKind::Mock));

        let answer = provider
            .chat(ChatRequest::builder().system("policy").user("登录失败").build())
            .await
            .unwrap();

        assert_eq!(
            answer,
            "This is a mock response from mock-model. Your last message was: 登录失败"
        );
    }

    #[tokio::test]
    async fn test_embedding_is_constant_and_sized() {
        let mut config = ProviderConfig::defaults(ProviderKind::Mock);
        let provider = EchoProvider::new(&config);

        let first = provider.embed("a").await.unwrap();
        let second = provider.embed("something else").await.unwrap();

        assert_eq!(first.len(), 1024);
        assert_eq!(first, second);
        assert!(first.iter().all(|v| *v == ECHO_EMBEDDING_VALUE));

        config.embedding_dimensions = 8;
        assert_eq!(EchoProvider::new(&config).embed("a").await.unwrap().len(), 8);
    }
}
