use std::sync::Arc;

use tracing::debug;

use crate::domain::{
    DocumentStore, DomainError, EmbeddingClient, KnowledgeBasePartition, RetrievedCandidate,
};

pub const DEFAULT_TOP_K: usize = 3;

/// Embeds a query and asks the document store for its nearest neighbours
#[derive(Debug, Clone)]
pub struct Retriever {
    embedding: Arc<dyn EmbeddingClient>,
    store: Arc<dyn DocumentStore>,
}

impl Retriever {
    pub fn new(embedding: Arc<dyn EmbeddingClient>, store: Arc<dyn DocumentStore>) -> Self {
        Self { embedding, store }
    }

    /// Up to `top_k` candidates ordered by ascending distance.
    ///
    /// An empty store or a partition with no matches yields an empty list.
    /// Embedding failures propagate.
    pub async fn retrieve(
        &self,
        query: &str,
        partition: &KnowledgeBasePartition,
        top_k: usize,
    ) -> Result<Vec<RetrievedCandidate>, DomainError> {
        if top_k == 0 {
            return Ok(Vec::new());
        }

        let vector = self.embedding.embed(query).await?;

        debug!(
            provider = self.embedding.provider_name(),
            model = self.embedding.embedding_model(),
            dimensions = vector.len(),
            store = self.store.store_type(),
            partition = %partition,
            top_k,
            "Embedded query"
        );

        let candidates = self.store.similarity_search(&vector, partition, top_k).await?;

        debug!(results = candidates.len(), "Retrieved candidates");

        Ok(candidates)
    }
}
