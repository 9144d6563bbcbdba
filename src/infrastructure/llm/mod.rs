//! LLM provider implementations

mod echo;
mod embedding_response;
mod endpoint;
mod factory;
mod http_client;
mod openai_compatible;
mod provider_client;
mod provider_config;
mod zhipu;

pub use echo::EchoProvider;
pub use embedding_response::extract_embedding;
pub use endpoint::{normalize_base_url, EndpointResolver, ProbeHit};
pub use factory::ClientFactory;
pub use http_client::{HttpClient, HttpClientTrait};
pub use openai_compatible::OpenAiCompatibleProvider;
pub use provider_client::ProviderClient;
pub use provider_config::{
    ProviderConfig, ProviderKind, ProviderOverrides, DEFAULT_CHAT_TIMEOUT,
    DEFAULT_EMBEDDING_DIMENSIONS, DEFAULT_EMBEDDING_TIMEOUT, PLACEHOLDER_API_KEY,
};
pub use zhipu::ZhipuProvider;

#[cfg(test)]
pub use http_client::mock::MockHttpClient;
