use std::sync::Arc;

use tracing::info;

use super::echo::EchoProvider;
use super::http_client::{HttpClient, HttpClientTrait};
use super::openai_compatible::OpenAiCompatibleProvider;
use super::provider_client::ProviderClient;
use super::provider_config::{ProviderConfig, ProviderKind, ProviderOverrides};
use super::zhipu::ZhipuProvider;
use crate::config::{EnvSource, LlmSettings};
use crate::domain::DomainError;

/// Factory for creating provider clients
#[derive(Debug)]
pub struct ClientFactory;

impl ClientFactory {
    /// Create a client for an already resolved configuration
    pub fn create(config: &ProviderConfig) -> ProviderClient {
        Self::create_with_http(config, Arc::new(HttpClient::new()))
    }

    /// Create a client sharing the given transport
    pub fn create_with_http(
        config: &ProviderConfig,
        http: Arc<dyn HttpClientTrait>,
    ) -> ProviderClient {
        info!(
            provider = config.kind.name(),
            chat_model = %config.chat_model,
            embedding_model = %config.embedding_model,
            chat_base_url = %config.chat_base_url,
            "Creating LLM client"
        );

        match config.kind {
            ProviderKind::Zhipu => {
                ProviderClient::ReferenceSdk(ZhipuProvider::new(http, config.clone()))
            }
            ProviderKind::OpenAiCompatible => ProviderClient::HttpCompatible(
                OpenAiCompatibleProvider::new(http, config.clone()),
            ),
            ProviderKind::Ollama => {
                ProviderClient::Local(OpenAiCompatibleProvider::new(http, config.clone()))
            }
            ProviderKind::Mock => ProviderClient::Test(EchoProvider::new(config)),
        }
    }

    /// Resolve configuration from file settings, overrides and environment, then create
    pub fn from_settings(
        settings: &LlmSettings,
        overrides: &ProviderOverrides,
        env: &dyn EnvSource,
    ) -> Result<ProviderClient, DomainError> {
        let config = ProviderConfig::resolve(settings, overrides, env)?;
        Ok(Self::create(&config))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{ChatClient, ChatRequest, EmbeddingClient};
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use serde_json::json;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    fn client_for(provider: &str) -> ProviderClient {
        ClientFactory::from_settings(
            &LlmSettings::default(),
            &ProviderOverrides::default(),
            &env(&[("LLM_PROVIDER", provider)]),
        )
        .unwrap()
    }

    #[test]
    fn test_provider_mapping() {
        assert!(matches!(client_for("zhipu"), ProviderClient::ReferenceSdk(_)));
        assert!(matches!(client_for("OpenAI"), ProviderClient::HttpCompatible(_)));
        assert!(matches!(client_for("VLLM"), ProviderClient::HttpCompatible(_)));
        assert!(matches!(client_for("Ollama"), ProviderClient::Local(_)));
        assert!(matches!(client_for("MOCK"), ProviderClient::Test(_)));
    }

    #[test]
    fn test_unknown_provider_uses_default() {
        let client = client_for("some-new-vendor");
        assert_eq!(client.kind(), ProviderKind::Zhipu);
        assert_eq!(ChatClient::provider_name(&client), "zhipu");
    }

    #[test]
    fn test_override_beats_environment() {
        let overrides = ProviderOverrides {
            provider: Some("mock".into()),
            chat_model: Some("echo-1".into()),
            ..Default::default()
        };

        let client = ClientFactory::from_settings(
            &LlmSettings::default(),
            &overrides,
            &env(&[("LLM_PROVIDER", "ollama"), ("LLM_MODEL", "qwen:14b")]),
        )
        .unwrap();

        assert_eq!(client.kind(), ProviderKind::Mock);
        assert_eq!(client.chat_model(), "echo-1");
        assert_eq!(client.embedding_model(), "mock-embedding");
    }

    #[tokio::test]
    async fn test_local_client_forces_vision_model() {
        let mut config = ProviderConfig::defaults(ProviderKind::Ollama);
        config.chat_base_url = "http://gpu:11434/v1".into();
        let http = Arc::new(MockHttpClient::new().with_response(
            "http://gpu:11434/v1/chat/completions",
            json!({"choices": [{"message": {"content": "ok"}}]}),
        ));

        let client = ClientFactory::create_with_http(&config, http.clone());
        client
            .chat(ChatRequest::builder().user("纯文本").build())
            .await
            .unwrap();
        assert_eq!(http.last_body().unwrap()["model"], "qwen:7b");

        client
            .chat(ChatRequest::builder().user("看图").build().with_image("aW1n"))
            .await
            .unwrap();
        let body = http.last_body().unwrap();
        assert_eq!(body["model"], "llava");
        assert_eq!(body["messages"][0]["images"][0], "aW1n");
    }

    #[tokio::test]
    async fn test_test_client_needs_no_network() {
        let client = client_for("mock");

        let vector = client.embed("hello").await.unwrap();
        let answer = client
            .chat(ChatRequest::builder().user("hello").build())
            .await
            .unwrap();

        assert_eq!(vector.len(), 1024);
        assert!(answer.ends_with("Your last message was: hello"));
    }
}
