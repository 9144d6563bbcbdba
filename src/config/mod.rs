//! Application configuration

mod app_config;
pub mod layered;

pub use app_config::{
    AppConfig, DatabaseSettings, LlmSettings, LogFormat, LoggingConfig, RetrievalSettings,
};
pub use layered::{EnvSource, ProcessEnv};
