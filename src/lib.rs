//! Ops Knowledge QA
//!
//! Retrieval-augmented question answering over an operations knowledge base:
//! - One chat + embedding contract over Zhipu, OpenAI-compatible, Ollama and an offline provider
//! - Endpoint probing for servers that mount their chat route inconsistently
//! - pgvector similarity search scoped by knowledge-base partition
//! - Relevance-gated prompting with deduplicated citations

pub mod cli;
pub mod config;
pub mod domain;
pub mod infrastructure;

pub use config::AppConfig;
