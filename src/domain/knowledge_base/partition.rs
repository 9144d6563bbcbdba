//! Knowledge-base partitions

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

/// Partition that bypasses filtering
pub const ALL_PARTITIONS: &str = "all";
/// Partition used when the caller does not name one
pub const DEFAULT_PARTITION: &str = "user";

/// Logical knowledge base a query is scoped to
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum KnowledgeBasePartition {
    /// Every document, no filter applied
    All,
    /// Documents tagged with this partition, plus untagged ones
    Named(String),
}

impl KnowledgeBasePartition {
    pub fn named(tag: impl Into<String>) -> Self {
        Self::Named(tag.into())
    }

    /// Whether a document with the given tag is visible in this partition.
    ///
    /// Untagged documents are visible to every partition.
    pub fn admits(&self, tag: Option<&str>) -> bool {
        match (self, tag) {
            (Self::All, _) => true,
            (Self::Named(_), None) => true,
            (Self::Named(name), Some(tag)) => name == tag,
        }
    }

    /// Tag to filter on, `None` when no filter applies
    pub fn filter_tag(&self) -> Option<&str> {
        match self {
            Self::All => None,
            Self::Named(name) => Some(name),
        }
    }
}

impl Default for KnowledgeBasePartition {
    fn default() -> Self {
        Self::Named(DEFAULT_PARTITION.to_string())
    }
}

impl FromStr for KnowledgeBasePartition {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            Ok(Self::default())
        } else if s.eq_ignore_ascii_case(ALL_PARTITIONS) {
            Ok(Self::All)
        } else {
            Ok(Self::Named(s.to_string()))
        }
    }
}

impl fmt::Display for KnowledgeBasePartition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => write!(f, "{}", ALL_PARTITIONS),
            Self::Named(name) => write!(f, "{}", name),
        }
    }
}
