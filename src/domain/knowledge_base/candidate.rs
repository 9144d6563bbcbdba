//! Retrieved document candidates

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Metadata key carrying the file name a chunk was ingested from
pub const FILENAME_KEY: &str = "filename";
/// Metadata key carrying the original path or URL of the file
pub const SOURCE_KEY: &str = "source";
/// Metadata key carrying the knowledge-base partition tag
pub const PARTITION_KEY: &str = "kb_type";

/// Read-only projection of a stored document plus its distance to the query
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetrievedCandidate {
    pub id: String,
    pub content: String,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    /// Vector distance to the query, lower is more similar
    pub distance: f64,
}

impl RetrievedCandidate {
    pub fn new(id: impl Into<String>, content: impl Into<String>, distance: f64) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Map::new(),
            distance,
        }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: Value) -> Self {
        self.metadata.insert(key.into(), value);
        self
    }

    pub fn with_all_metadata(mut self, metadata: Map<String, Value>) -> Self {
        self.metadata = metadata;
        self
    }

    /// File name, only when present and not null
    pub fn filename(&self) -> Option<String> {
        metadata_text(&self.metadata, FILENAME_KEY)
    }

    pub fn source(&self) -> Option<String> {
        metadata_text(&self.metadata, SOURCE_KEY)
    }

    /// Partition tag as Postgres `->>` renders it; `None` for legacy
    /// untagged documents
    pub fn partition_tag(&self) -> Option<String> {
        partition_tag(&self.metadata)
    }
}

/// `kb_type` of a metadata object, non-null scalars rendered as text
pub fn partition_tag(metadata: &Map<String, Value>) -> Option<String> {
    metadata_text(metadata, PARTITION_KEY)
}

fn metadata_text(metadata: &Map<String, Value>, key: &str) -> Option<String> {
    match metadata.get(key)? {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    }
}
