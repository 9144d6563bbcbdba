//! Embedding domain models and the embedding capability trait

mod provider;
mod vector;

pub use provider::EmbeddingClient;
pub use vector::{l2_distance, EmbeddingVector};

#[cfg(test)]
pub use provider::mock::MockEmbeddingClient;
