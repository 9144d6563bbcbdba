//! In-memory document store for development and testing

use std::collections::BTreeMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::embedding::l2_distance;
use crate::domain::knowledge_base::partition_tag;
use crate::domain::{
    DocumentStore, DomainError, EmbeddingVector, KnowledgeBasePartition, PartitionCount,
    RetrievedCandidate,
};

#[derive(Debug, Clone)]
struct StoredDoc {
    id: String,
    content: String,
    metadata: serde_json::Map<String, serde_json::Value>,
    embedding: EmbeddingVector,
}

/// Brute-force L2 search over documents held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryDocumentStore {
    documents: Arc<RwLock<Vec<StoredDoc>>>,
}

impl InMemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a document with a precomputed embedding
    pub async fn insert(
        &self,
        id: impl Into<String>,
        content: impl Into<String>,
        metadata: serde_json::Value,
        embedding: EmbeddingVector,
    ) {
        let metadata = match metadata {
            serde_json::Value::Object(map) => map,
            _ => serde_json::Map::new(),
        };

        self.documents.write().await.push(StoredDoc {
            id: id.into(),
            content: content.into(),
            metadata,
            embedding,
        });
    }

    pub async fn len(&self) -> usize {
        self.documents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.documents.read().await.is_empty()
    }
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    fn store_type(&self) -> &'static str {
        "in_memory"
    }

    async fn similarity_search(
        &self,
        query: &[f32],
        partition: &KnowledgeBasePartition,
        limit: usize,
    ) -> Result<Vec<RetrievedCandidate>, DomainError> {
        let docs = self.documents.read().await;

        let mut candidates: Vec<RetrievedCandidate> = docs
            .iter()
            .map(|doc| {
                RetrievedCandidate::new(
                    &doc.id,
                    &doc.content,
                    f64::from(l2_distance(query, &doc.embedding)),
                )
                .with_all_metadata(doc.metadata.clone())
            })
            .filter(|candidate| partition.admits(candidate.partition_tag().as_deref()))
            .collect();

        // stable sort keeps insertion order for equal distances
        candidates.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        candidates.truncate(limit);

        Ok(candidates)
    }

    async fn partition_counts(&self) -> Result<Vec<PartitionCount>, DomainError> {
        let docs = self.documents.read().await;

        let mut counts: BTreeMap<Option<String>, u64> = BTreeMap::new();
        for doc in docs.iter() {
            *counts.entry(partition_tag(&doc.metadata)).or_default() += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(partition, documents)| PartitionCount {
                partition,
                documents,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    async fn seeded() -> InMemoryDocumentStore {
        let store = InMemoryDocumentStore::new();
        store
            .insert("1", "用户登录指引", json!({"filename": "login_guide.md", "kb_type": "user"}), vec![0.0, 0.0])
            .await;
        store
            .insert("2", "数据库主备切换", json!({"filename": "db_failover.md", "kb_type": "ops"}), vec![0.1, 0.0])
            .await;
        store
            .insert("3", "旧版FAQ", json!({"filename": "faq.md"}), vec![1.0, 1.0])
            .await;
        store
            .insert("4", "null tag", json!({"filename": "legacy.md", "kb_type": null}), vec![2.0, 2.0])
            .await;
        store
    }

    #[tokio::test]
    async fn test_results_are_ordered_by_distance() {
        let store = seeded().await;

        let results = store
            .similarity_search(&[0.0, 0.0], &KnowledgeBasePartition::All, 10)
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "2", "3", "4"]);
        assert!(results.windows(2).all(|w| w[0].distance <= w[1].distance));
    }

    #[tokio::test]
    async fn test_named_partition_admits_untagged_documents() {
        let store = seeded().await;

        let results = store
            .similarity_search(&[0.0, 0.0], &KnowledgeBasePartition::named("user"), 10)
            .await
            .unwrap();

        let ids: Vec<&str> = results.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["1", "3", "4"]);
    }

    #[tokio::test]
    async fn test_limit_and_empty_store() {
        let store = seeded().await;
        let results = store
            .similarity_search(&[0.0, 0.0], &KnowledgeBasePartition::All, 2)
            .await
            .unwrap();
        assert_eq!(results.len(), 2);

        let empty = InMemoryDocumentStore::new();
        assert!(empty.is_empty().await);
        assert!(empty
            .similarity_search(&[0.0], &KnowledgeBasePartition::default(), 3)
            .await
            .unwrap()
            .is_empty());
    }

    #[tokio::test]
    async fn test_partition_counts() {
        let store = seeded().await;

        let counts = store.partition_counts().await.unwrap();

        assert_eq!(
            counts,
            vec![
                PartitionCount { partition: None, documents: 2 },
                PartitionCount { partition: Some("ops".into()), documents: 1 },
                PartitionCount { partition: Some("user".into()), documents: 1 },
            ]
        );
    }

    #[tokio::test]
    async fn test_non_string_tag_is_filtered_like_postgres() {
        let store = InMemoryDocumentStore::new();
        store
            .insert("1", "numeric tag", json!({"filename": "five.md", "kb_type": 5}), vec![0.0, 0.0])
            .await;
        store
            .insert("2", "untagged", json!({"filename": "faq.md"}), vec![1.0, 0.0])
            .await;

        let named = store
            .similarity_search(&[0.0, 0.0], &KnowledgeBasePartition::named("user"), 5)
            .await
            .unwrap();
        let ids: Vec<&str> = named.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["2"]);

        let five = store
            .similarity_search(&[0.0, 0.0], &KnowledgeBasePartition::named("5"), 5)
            .await
            .unwrap();
        assert_eq!(five.len(), 2);

        let counts = store.partition_counts().await.unwrap();
        assert_eq!(
            counts,
            vec![
                PartitionCount { partition: None, documents: 1 },
                PartitionCount { partition: Some("5".into()), documents: 1 },
            ]
        );
    }
}
