use std::sync::Arc;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, info};

use super::http_client::{truncate, HttpClientTrait};
use super::openai_compatible::parse_chat_content;
use super::provider_config::ProviderConfig;
use crate::domain::{ChatClient, ChatRequest, DomainError, EmbeddingClient, EmbeddingVector};

const SNAPSHOT_LIMIT: usize = 500;

/// Zhipu BigModel provider.
///
/// Talks to the fixed v4 routes (`/chat/completions`, `/embeddings`) without
/// probing, and only accepts the documented `data[0].embedding` shape.
#[derive(Debug, Clone)]
pub struct ZhipuProvider {
    client: Arc<dyn HttpClientTrait>,
    config: ProviderConfig,
    auth_header: String,
}

impl ZhipuProvider {
    pub fn new(client: Arc<dyn HttpClientTrait>, config: ProviderConfig) -> Self {
        let auth_header = format!("Bearer {}", config.api_key);

        Self {
            client,
            config,
            auth_header,
        }
    }

    pub fn config(&self) -> &ProviderConfig {
        &self.config
    }

    fn chat_url(&self) -> String {
        format!("{}/chat/completions", self.config.chat_base_url)
    }

    fn embeddings_url(&self) -> String {
        format!("{}/embeddings", self.config.embedding_base_url)
    }

    fn headers(&self) -> Vec<(&str, &str)> {
        vec![
            ("Authorization", self.auth_header.as_str()),
            ("Content-Type", "application/json"),
        ]
    }
}

#[async_trait]
impl ChatClient for ZhipuProvider {
    async fn chat(&self, request: ChatRequest) -> Result<String, DomainError> {
        let url = self.chat_url();
        let model = self.config.model_for(request.has_image());
        let body = serde_json::json!({
            "model": model,
            "messages": request.wire_messages(self.config.kind.image_style()),
            "temperature": request.temperature,
        });

        let response = self
            .client
            .post_json(&url, self.headers(), &body, self.config.chat_timeout)
            .await
            .map_err(|e| match e {
                // surface API-level failures under the provider's name
                DomainError::Http { status, body, .. } => DomainError::provider(
                    "zhipu",
                    format!("HTTP {}: {}", status, body),
                ),
                other => other,
            })?;

        info!(provider = "zhipu", model = %model, "Chat completion succeeded");

        parse_chat_content(response)
    }

    fn provider_name(&self) -> &'static str {
        "zhipu"
    }

    fn chat_model(&self) -> &str {
        &self.config.chat_model
    }
}

#[async_trait]
impl EmbeddingClient for ZhipuProvider {
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError> {
        let url = self.embeddings_url();
        let body = serde_json::json!({
            "model": self.config.embedding_model,
            "input": text,
        });

        debug!(url = %url, model = %self.config.embedding_model, "Requesting embedding");

        let response = self
            .client
            .post_json(&url, self.headers(), &body, self.config.embedding_timeout)
            .await?;

        let snapshot = truncate(&response.to_string(), SNAPSHOT_LIMIT);
        let parsed: EmbeddingResponse = serde_json::from_value(response).map_err(|e| {
            DomainError::protocol(format!("Failed to parse embedding response: {}", e), snapshot.clone())
        })?;

        parsed
            .data
            .into_iter()
            .next()
            .map(|item| item.embedding)
            .filter(|embedding| !embedding.is_empty())
            .ok_or_else(|| DomainError::protocol("No embedding in response", snapshot))
    }

    fn provider_name(&self) -> &'static str {
        "zhipu"
    }

    fn embedding_model(&self) -> &str {
        &self.config.embedding_model
    }
}

// Wire types

#[derive(Debug, Deserialize)]
struct EmbeddingResponse {
    data: Vec<EmbeddingData>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingData {
    embedding: Vec<f32>,
}
