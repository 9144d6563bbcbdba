//! Retrieval and answer generation

mod pipeline;
mod retriever;

pub use pipeline::{AnswerPipeline, GENERATION_FAILURE_PREFIX};
pub use retriever::{Retriever, DEFAULT_TOP_K};
