//! Domain layer - Core business logic and entities

pub mod embedding;
pub mod error;
pub mod knowledge_base;
pub mod llm;
pub mod rag;

pub use embedding::{EmbeddingClient, EmbeddingVector};
pub use error::DomainError;
pub use knowledge_base::{
    DocumentStore, KnowledgeBasePartition, PartitionCount, RetrievedCandidate,
};
pub use llm::{ChatClient, ChatRequest, ChatRequestBuilder, ContentPart, ImageStyle, Message, MessageRole};
pub use rag::{AnswerResult, GenerationOutcome, SourceCitation};
