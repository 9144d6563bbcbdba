//! Provider kinds and the resolved, immutable provider configuration

use std::fmt;
use std::time::Duration;

use tracing::warn;

use super::endpoint::normalize_base_url;
use crate::config::layered::{resolve, resolve_opt};
use crate::config::{EnvSource, LlmSettings};
use crate::domain::{DomainError, ImageStyle};

pub const DEFAULT_CHAT_TIMEOUT: Duration = Duration::from_secs(60);
pub const DEFAULT_EMBEDDING_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_EMBEDDING_DIMENSIONS: usize = 1024;
/// API key sent when none is configured; local servers usually ignore it
pub const PLACEHOLDER_API_KEY: &str = "dummy";

/// Closed set of provider implementations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProviderKind {
    /// Zhipu BigModel, spoken through its own fixed API contract
    Zhipu,
    /// Any server implementing the OpenAI wire format
    OpenAiCompatible,
    /// Ollama's OpenAI-compatible endpoint
    Ollama,
    /// Deterministic offline provider
    Mock,
}

impl ProviderKind {
    pub const DEFAULT: ProviderKind = ProviderKind::Zhipu;

    /// Case-insensitive lookup of a provider identifier
    pub fn from_id(id: &str) -> Option<Self> {
        match id.trim().to_ascii_lowercase().as_str() {
            "zhipu" | "zhipuai" | "glm" => Some(Self::Zhipu),
            "openai" | "openai_compatible" | "openai-compatible" | "http" | "vllm" => {
                Some(Self::OpenAiCompatible)
            }
            "ollama" | "local" => Some(Self::Ollama),
            "mock" | "test" => Some(Self::Mock),
            _ => None,
        }
    }

    /// Like [`from_id`](Self::from_id), falling back to the default provider
    pub fn from_id_or_default(id: Option<&str>) -> Self {
        match id {
            None => Self::DEFAULT,
            Some(id) => Self::from_id(id).unwrap_or_else(|| {
                warn!(
                    provider = id,
                    fallback = Self::DEFAULT.name(),
                    "Unknown LLM provider, using default"
                );
                Self::DEFAULT
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Zhipu => "zhipu",
            Self::OpenAiCompatible => "openai_compatible",
            Self::Ollama => "ollama",
            Self::Mock => "mock",
        }
    }

    pub fn default_base_url(&self) -> &'static str {
        match self {
            Self::Zhipu => "https://open.bigmodel.cn/api/paas/v4",
            Self::OpenAiCompatible => "http://localhost:8000/v1",
            Self::Ollama => "http://localhost:11434/v1",
            Self::Mock => "http://localhost",
        }
    }

    pub fn default_chat_model(&self) -> &'static str {
        match self {
            Self::Zhipu => "glm-4",
            Self::OpenAiCompatible => "gpt-3.5-turbo",
            Self::Ollama => "qwen:7b",
            Self::Mock => "mock-model",
        }
    }

    pub fn default_embedding_model(&self) -> &'static str {
        match self {
            Self::Zhipu => "embedding-2",
            Self::OpenAiCompatible => "text-embedding-ada-002",
            Self::Ollama => "nomic-embed-text",
            Self::Mock => "mock-embedding",
        }
    }

    /// Model forced when a request carries an image; `None` if the provider
    /// has no known vision model
    pub fn default_vision_model(&self) -> Option<&'static str> {
        match self {
            Self::Zhipu => Some("glm-4v"),
            Self::Ollama => Some("llava"),
            Self::OpenAiCompatible | Self::Mock => None,
        }
    }

    pub fn image_style(&self) -> ImageStyle {
        match self {
            Self::Zhipu => ImageStyle::ContentParts,
            Self::OpenAiCompatible | Self::Ollama | Self::Mock => ImageStyle::ImagesField,
        }
    }

    fn api_key_env(&self) -> &'static [&'static str] {
        match self {
            Self::Zhipu => &["ZHIPUAI_API_KEY", "LLM_API_KEY"],
            Self::OpenAiCompatible => &["OPENAI_API_KEY", "LLM_API_KEY"],
            Self::Ollama | Self::Mock => &["LLM_API_KEY"],
        }
    }

    fn base_url_env(&self) -> Option<&'static str> {
        match self {
            Self::Zhipu => Some("ZHIPUAI_BASE_URL"),
            Self::OpenAiCompatible => Some("OPENAI_BASE_URL"),
            Self::Ollama => Some("OLLAMA_BASE_URL"),
            Self::Mock => None,
        }
    }
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Call-time overrides; they beat every other configuration layer
#[derive(Debug, Clone, Default)]
pub struct ProviderOverrides {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    pub chat_base_url: Option<String>,
    pub embedding_base_url: Option<String>,
    pub chat_model: Option<String>,
    pub embedding_model: Option<String>,
}

/// Fully resolved provider configuration
#[derive(Clone, PartialEq, Eq)]
pub struct ProviderConfig {
    pub kind: ProviderKind,
    pub api_key: String,
    pub chat_base_url: String,
    pub embedding_base_url: String,
    pub chat_model: String,
    pub embedding_model: String,
    pub vision_model: Option<String>,
    pub chat_timeout: Duration,
    pub embedding_timeout: Duration,
    pub embedding_dimensions: usize,
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("kind", &self.kind)
            .field("api_key", &"<redacted>")
            .field("chat_base_url", &self.chat_base_url)
            .field("embedding_base_url", &self.embedding_base_url)
            .field("chat_model", &self.chat_model)
            .field("embedding_model", &self.embedding_model)
            .field("vision_model", &self.vision_model)
            .field("chat_timeout", &self.chat_timeout)
            .field("embedding_timeout", &self.embedding_timeout)
            .field("embedding_dimensions", &self.embedding_dimensions)
            .finish()
    }
}

impl ProviderConfig {
    /// Built-in defaults for a provider kind
    pub fn defaults(kind: ProviderKind) -> Self {
        Self {
            kind,
            api_key: PLACEHOLDER_API_KEY.to_string(),
            chat_base_url: kind.default_base_url().to_string(),
            embedding_base_url: kind.default_base_url().to_string(),
            chat_model: kind.default_chat_model().to_string(),
            embedding_model: kind.default_embedding_model().to_string(),
            vision_model: kind.default_vision_model().map(str::to_string),
            chat_timeout: DEFAULT_CHAT_TIMEOUT,
            embedding_timeout: DEFAULT_EMBEDDING_TIMEOUT,
            embedding_dimensions: DEFAULT_EMBEDDING_DIMENSIONS,
        }
    }

    /// Resolve every field: override > config file > environment > default
    pub fn resolve(
        settings: &LlmSettings,
        overrides: &ProviderOverrides,
        env: &dyn EnvSource,
    ) -> Result<Self, DomainError> {
        let provider_id = resolve_opt(
            &[overrides.provider.as_deref(), settings.provider.as_deref()],
            env,
            &["LLM_PROVIDER"],
        );
        let kind = ProviderKind::from_id_or_default(provider_id.as_deref());

        let api_key = resolve(
            &[overrides.api_key.as_deref(), settings.api_key.as_deref()],
            env,
            kind.api_key_env(),
            PLACEHOLDER_API_KEY,
        );

        let base_env: Vec<&str> = kind.base_url_env().into_iter().collect();
        let chat_env: Vec<&str> = ["LLM_CHAT_BASE_URL", "LLM_BASE_URL"]
            .into_iter()
            .chain(base_env.iter().copied())
            .collect();
        let embedding_env: Vec<&str> = ["LLM_EMBEDDING_BASE_URL", "LLM_BASE_URL"]
            .into_iter()
            .chain(base_env.iter().copied())
            .collect();

        let chat_base_url = resolve(
            &[
                overrides.chat_base_url.as_deref(),
                settings.chat_base_url.as_deref(),
                settings.base_url.as_deref(),
            ],
            env,
            &chat_env,
            kind.default_base_url(),
        );
        let embedding_base_url = resolve(
            &[
                overrides.embedding_base_url.as_deref(),
                settings.embedding_base_url.as_deref(),
                settings.base_url.as_deref(),
            ],
            env,
            &embedding_env,
            kind.default_base_url(),
        );

        let chat_model = resolve(
            &[overrides.chat_model.as_deref(), settings.model.as_deref()],
            env,
            &["LLM_MODEL"],
            kind.default_chat_model(),
        );
        let embedding_model = resolve(
            &[
                overrides.embedding_model.as_deref(),
                settings.embedding_model.as_deref(),
            ],
            env,
            &["EMBEDDING_MODEL"],
            kind.default_embedding_model(),
        );
        let vision_model = resolve_opt(
            &[settings.vision_model.as_deref()],
            env,
            &["LLM_VISION_MODEL"],
        )
        .or_else(|| kind.default_vision_model().map(str::to_string));

        let config = Self {
            kind,
            api_key,
            chat_base_url: normalize_base_url(&chat_base_url),
            embedding_base_url: normalize_base_url(&embedding_base_url),
            chat_model,
            embedding_model,
            vision_model,
            chat_timeout: settings
                .chat_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_CHAT_TIMEOUT),
            embedding_timeout: settings
                .embedding_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_EMBEDDING_TIMEOUT),
            embedding_dimensions: settings
                .embedding_dimensions
                .unwrap_or(DEFAULT_EMBEDDING_DIMENSIONS),
        };

        config.validate()?;
        Ok(config)
    }

    /// Reject configurations no request could succeed with
    pub fn validate(&self) -> Result<(), DomainError> {
        for (name, url) in [
            ("chat base URL", &self.chat_base_url),
            ("embedding base URL", &self.embedding_base_url),
        ] {
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                return Err(DomainError::configuration(format!(
                    "{} must be an http(s) URL, got '{}'",
                    name, url
                )));
            }
        }

        if self.chat_model.trim().is_empty() || self.embedding_model.trim().is_empty() {
            return Err(DomainError::configuration("chat and embedding models are required"));
        }

        if self.chat_timeout.is_zero() || self.embedding_timeout.is_zero() {
            return Err(DomainError::configuration("timeouts must be greater than zero"));
        }

        if self.kind == ProviderKind::Mock && self.embedding_dimensions == 0 {
            return Err(DomainError::configuration(
                "embedding dimensions must be greater than zero",
            ));
        }

        Ok(())
    }

    /// Model to use for a request, switching to the vision model when an image is attached
    pub fn model_for(&self, has_image: bool) -> &str {
        match (&self.vision_model, has_image) {
            (Some(vision), true) => vision,
            _ => &self.chat_model,
        }
    }
}
