//! Document store port

use std::fmt::Debug;

use async_trait::async_trait;

use super::{KnowledgeBasePartition, RetrievedCandidate};
use crate::domain::DomainError;

/// Number of stored chunks carrying one partition tag (`None` = untagged)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartitionCount {
    pub partition: Option<String>,
    pub documents: u64,
}

/// Nearest-neighbour query surface of the external document store.
///
/// Implementations return rows ordered ascending by distance and apply the
/// partition rule of [`KnowledgeBasePartition::admits`].
#[async_trait]
pub trait DocumentStore: Send + Sync + Debug {
    /// Get the store type name
    fn store_type(&self) -> &'static str;

    /// Find the `limit` nearest documents to `query` within `partition`
    async fn similarity_search(
        &self,
        query: &[f32],
        partition: &KnowledgeBasePartition,
        limit: usize,
    ) -> Result<Vec<RetrievedCandidate>, DomainError>;

    /// Count stored chunks grouped by partition tag
    async fn partition_counts(&self) -> Result<Vec<PartitionCount>, DomainError>;
}
