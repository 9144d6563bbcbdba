use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::embedding_response::extract_embedding;
use super::endpoint::EndpointResolver;
use super::http_client::{truncate, HttpClientTrait};
use super::provider_config::ProviderConfig;
use crate::domain::{ChatClient, ChatRequest, DomainError, EmbeddingClient, EmbeddingVector};

const SNAPSHOT_LIMIT: usize = 500;

/// Client for servers speaking the OpenAI wire format (vLLM, LM Studio,
/// Ollama, OpenAI itself, ...).
///
/// Chat requests probe a handful of URL layouts derived from the base URL;
/// embeddings go to `{base}/embeddings` directly and accept several `data`
/// shapes.
#[derive(Debug, Clone)]
pub struct OpenAiCompatibleProvider {
    client: Arc<dyn HttpClientTrait>,
    config: ProviderConfig,
    auth_header: String,
    chat_endpoints: EndpointResolver,
    embedding_endpoints: EndpointResolver,
}

impl OpenAiCompatibleProvider {
    pub fn new(client: Arc<dyn HttpClientTrait>, config: ProviderConfig) -> Self {
        let auth_header = format!("Bearer {}", config.api_key);
        let chat_endpoints = EndpointResolver::new(&config.chat_base_url);
        let embedding_endpoints = EndpointResolver::new(&config.embedding_base_url);

        Self {
            client,
            config,
            auth_header,
            chat_endpoints,
            embedding_endpoints,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }

    fn build_chat_body(&self, request: &ChatRequest) -> serde_json::Value {
        let model = self.config.model_for(request.has_image());
        let messages = request.wire_messages(self.config.kind.image_style());

        serde_json::json!({
            "model": model,
            "messages": messages,
            "temperature": request.temperature,
        })
    }
}

#[async_trait]
impl ChatClient for OpenAiCompatibleProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, DomainError> {
        let model = self.config.model_for(request.has_image()).to_string();
        let body = self.build_chat_body(&request);

        let hit = self
            .chat_endpoints
            .probe_chat(
                self.client.as_ref(),
                self.headers(),
                &body,
                self.config.chat_timeout,
            )
            .await?;

        info!(
            provider = ChatClient::provider_name(self),
            url = %hit.url,
            model = %model,
            "Chat completion succeeded"
        );

        parse_chat_content(hit.response)
    }

    fn provider_name(&self) -> &'static str {
        self.config.kind.name()
    }

    fn chat_model(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl EmbeddingClient for OpenAiCompatibleProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
        let url = self.embedding_endpoints.embeddings_url();
        let body = serde_json::json!({
            "model": self.config.embedding_model,
            "input": text,
        });

        debug!(url = %url, model = %self.config.embedding_model, "Requesting embedding");

        let response = self
            .client
            .post_json(&url, self.headers(), &body, self.config.embedding_timeout)
            .await?;

        extract_embedding(&response)
    }

    fn provider_name(&self) -> &'static str {
        self.config.kind.name()
    }

    fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }
}

/// Read `choices[0].message.content` from a chat completion response
pub(crate) fn parse_chat_content(json: serde_json::Value) -> Result<String, DomainError> {
    let snapshot = || truncate(&json.to_string(), SNAPSHOT_LIMIT);

    let response: ChatCompletionResponse = serde_json::from_value(json.clone()).map_err(|e| {
        DomainError::protocol(format!("Failed to parse chat response: {}", e), snapshot())
    })?;

    let choice = response
        .choices
        .into_iter()
        .next()
        .ok_or_else(|| DomainError::protocol("No choices in chat response", snapshot()))?;

    Ok(choice.message.content.unwrap_or_default())
}

// Wire types

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Message;
    use crate::infrastructure::llm::http_client::mock::MockHttpClient;
    use crate::infrastructure::llm::http_client::HttpClient;
    use crate::infrastructure::llm::provider_config::ProviderKind;
    use serde_json::json;
    use wiremock::matchers::{body_partial_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn config(base_url: &str) -> ProviderConfig {
        let mut config = ProviderConfig::defaults(ProviderKind::OpenAiCompatible);
        config.chat_base_url = base_url.to_string();
        config.embedding_base_url = base_url.to_string();
        config.chat_model = "qwen2".to_string();
        config.embedding_model = "bge-m3".to_string();
        config
    }

    fn completion(content: &str) -> serde_json::Value {
        json!({"choices": [{"message": {"role": "assistant", "content": content}}]})
    }

    #[tokio::test]
    async fn test_chat_uses_first_routed_candidate() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_response("http://llm:8000/chat/completions", completion("pong")),
        );
        let provider = OpenAiCompatibleProvider::new(http.clone(), config("http://llm:8000/v1"));

        let answer = provider
            .chat(ChatRequest::builder().user("ping").build())
            .await
            .unwrap();

        assert_eq!(answer, "pong");
        assert_eq!(
            http.called_urls(),
            vec![
                "http://llm:8000/v1/chat/completions",
                "http://llm:8000/chat/completions",
            ]
        );

        let body = http.last_body().unwrap();
        assert_eq!(body["model"], "qwen2");
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "ping");
        assert!((body["temperature"].as_f64().unwrap() - 0.7).abs() < 1e-6);
    }

    #[tokio::test]
    async fn test_chat_with_image_uses_images_field() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_response("http://llm:8000/v1/chat/completions", completion("a cat")),
        );
        let provider = OpenAiCompatibleProvider::new(http.clone(), config("http://llm:8000/v1"));

        let request = ChatRequest::builder()
            .user("what is this?")
            .image(Some("data:image/png;base64,AAAA".to_string()))
            .build();
        provider.chat(request).await.unwrap();

        let body = http.last_body().unwrap();
        // no vision model is known for generic servers
        assert_eq!(body["model"], "qwen2");
        assert_eq!(body["messages"][0]["content"], "what is this?");
        assert_eq!(body["messages"][0]["images"][0], "data:image/png;base64,AAAA");
    }

    #[tokio::test]
    async fn test_chat_ollama_switches_to_vision_model() {
        let mut config = ProviderConfig::defaults(ProviderKind::Ollama);
        config.chat_base_url = "http://gpu:11434/v1".to_string();
        let http = Arc::new(
            MockHttpClient::new()
                .with_response("http://gpu:11434/v1/chat/completions", completion("ok")),
        );
        let provider = OpenAiCompatibleProvider::new(http.clone(), config);

        let request = ChatRequest::new(vec![Message::user("describe")])
            .with_image("http://img/1.png");
        provider.chat(request).await.unwrap();

        assert_eq!(http.last_body().unwrap()["model"], "llava");
    }

    #[tokio::test]
    async fn test_chat_without_choices_is_protocol_error() {
        let http = Arc::new(
            MockHttpClient::new()
                .with_response("http://llm:8000/v1/chat/completions", json!({"choices": []})),
        );
        let provider = OpenAiCompatibleProvider::new(http, config("http://llm:8000/v1"));

        let error = provider
            .chat(ChatRequest::builder().user("ping").build())
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::Protocol { .. }));
    }

    #[tokio::test]
    async fn test_embed_accepts_object_shaped_data() {
        let http = Arc::new(MockHttpClient::new().with_response(
            "http://llm:8000/v1/embeddings",
            json!({"data": {"0": {"embedding": [0.25, 0.5]}}}),
        ));
        let provider = OpenAiCompatibleProvider::new(
            http.clone(),
            config("http://llm:8000/v1/embeddings"),
        );

        let vector = provider.embed("登录失败").await.unwrap();

        assert_eq!(vector, vec![0.25, 0.5]);
        assert_eq!(http.called_urls(), vec!["http://llm:8000/v1/embeddings"]);
        assert_eq!(
            http.last_body().unwrap(),
            json!({"model": "bge-m3", "input": "登录失败"})
        );
    }

    #[tokio::test]
    async fn test_embed_is_never_probed() {
        let http = Arc::new(MockHttpClient::new());
        let provider = OpenAiCompatibleProvider::new(http.clone(), config("http://llm:8000/v1"));

        let error = provider.embed("text").await.unwrap_err();

        assert!(error.is_not_found());
        assert_eq!(http.called_urls().len(), 1);
    }

    #[tokio::test]
    async fn test_round_trip_against_http_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/chat/completions"))
            .and(header("Authorization", "Bearer sk-local"))
            .and(body_partial_json(json!({"model": "qwen2"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(completion("hello")))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!({"data": [{"embedding": [1.0, 0.0, 0.5]}]})),
            )
            .mount(&server)
            .await;

        let mut config = config(&format!("{}/v1", server.uri()));
        config.api_key = "sk-local".to_string();
        let provider = OpenAiCompatibleProvider::new(Arc::new(HttpClient::new()), config);

        let answer = provider
            .chat(ChatRequest::builder().user("hi").build())
            .await
            .unwrap();
        assert_eq!(answer, "hello");

        let vector = provider.embed("hi").await.unwrap();
        assert_eq!(vector, vec![1.0, 0.0, 0.5]);
    }

    #[test]
    fn test_null_content_becomes_empty_answer() {
        let content =
            parse_chat_content(json!({"choices": [{"message": {"content": null}}]})).unwrap();
        assert_eq!(content, "");
    }
}
