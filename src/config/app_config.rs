use std::path::Path;

use serde::Deserialize;

use crate::domain::knowledge_base::DEFAULT_PARTITION;

/// Application configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub logging: LoggingConfig,
    pub llm: LlmSettings,
    pub database: DatabaseSettings,
    pub retrieval: RetrievalSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: String,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Deserialize, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

/// Provider settings as written in the config file. Every field is optional;
/// unset fields fall through to the environment and then to defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: Option<String>,
    pub api_key: Option<String>,
    /// Shared base URL used when the chat/embedding specific ones are unset
    pub base_url: Option<String>,
    pub chat_base_url: Option<String>,
    pub embedding_base_url: Option<String>,
    /// Chat model
    pub model: Option<String>,
    pub embedding_model: Option<String>,
    pub vision_model: Option<String>,
    pub chat_timeout_secs: Option<u64>,
    pub embedding_timeout_secs: Option<u64>,
    pub embedding_dimensions: Option<usize>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    pub url: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub user: Option<String>,
    pub password: Option<String>,
    #[serde(alias = "dbname")]
    pub name: Option<String>,
    pub table: Option<String>,
    pub max_connections: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RetrievalSettings {
    pub top_k: usize,
    pub default_partition: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::default(),
        }
    }
}

impl Default for RetrievalSettings {
    fn default() -> Self {
        Self {
            top_k: 3,
            default_partition: DEFAULT_PARTITION.to_string(),
        }
    }
}

impl AppConfig {
    /// Load `config/default`, `config/local` and `config` (any supported
    /// format, all optional), then the explicit file if one is given.
    pub fn load(explicit: Option<&Path>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name("config/local").required(false))
            .add_source(config::File::with_name("config").required(false));

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path).required(true));
        }

        builder.build()?.try_deserialize()
    }

    /// Parse configuration from an in-memory document
    pub fn parse(content: &str, format: config::FileFormat) -> Result<Self, config::ConfigError> {
        config::Config::builder()
            .add_source(config::File::from_str(content, format))
            .build()?
            .try_deserialize()
    }
}
