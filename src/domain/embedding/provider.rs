//! Embedding capability trait definition

use async_trait::async_trait;
use std::fmt::Debug;

use super::EmbeddingVector;
use crate::domain::DomainError;

/// Embedding capability of a provider client.
///
/// One call embeds exactly one text. Failures are always errors: a made-up
/// vector would silently corrupt ranking.
#[async_trait]
pub trait EmbeddingClient: Send + Sync + Debug {
    /// Embed a single text
    async fn embed(&self, text: &str) -> Result<EmbeddingVector, DomainError>;

    /// Get the provider name
    fn provider_name(&self) -> &'static str;

    /// Embedding model in use
    fn embedding_model(&self) -> &str;
}
