//! Knowledge base domain - partitions, candidates and the document store port

mod candidate;
mod partition;
mod store;

pub use candidate::{partition_tag, RetrievedCandidate, FILENAME_KEY, PARTITION_KEY, SOURCE_KEY};
pub use partition::{KnowledgeBasePartition, ALL_PARTITIONS, DEFAULT_PARTITION};
pub use store::{DocumentStore, PartitionCount};
