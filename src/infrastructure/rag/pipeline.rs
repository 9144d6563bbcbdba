//! Answer pipeline
//!
//! Retrieves candidates, builds a relevance-gated prompt, asks the chat model
//! and attaches deduplicated citations. Generation failures degrade the
//! answer instead of failing the request; retrieval failures do fail it.

use std::sync::Arc;

use tracing::{debug, info, warn};

use super::retriever::{Retriever, DEFAULT_TOP_K};
use crate::domain::rag::{build_context, build_full_prompt, collect_citations};
use crate::domain::{AnswerResult, ChatClient, ChatRequest, DomainError, KnowledgeBasePartition};

/// Prefix of the answer text when generation fails
pub const GENERATION_FAILURE_PREFIX: &str = "调用 LLM 失败";

/// Question in, answer plus citations out
#[derive(Debug, Clone)]
pub struct AnswerPipeline {
    retriever: Retriever,
    chat: Arc<dyn ChatClient>,
    top_k: usize,
}

impl AnswerPipeline {
    pub fn new(retriever: Retriever, chat: Arc<dyn ChatClient>) -> Self {
        Self {
            retriever,
            chat,
            top_k: DEFAULT_TOP_K,
        }
    }

    /// Number of candidates retrieved per question
    pub fn with_top_k(mut self, top_k: usize) -> Self {
        self.top_k = top_k;
        self
    }

    pub fn top_k(&self) -> usize {
        self.top_k
    }

    pub async fn answer(
        &self,
        question: &str,
        image: Option<&str>,
        partition: &KnowledgeBasePartition,
    ) -> Result<AnswerResult, DomainError> {
        let question = question.trim();
        if question.is_empty() {
            return Err(DomainError::validation("question must not be empty"));
        }

        info!(
            partition = %partition,
            has_image = image.is_some(),
            top_k = self.top_k,
            "Answering question"
        );

        // RETRIEVE
        let candidates = self
            .retriever
            .retrieve(question, partition, self.top_k)
            .await?;

        // BUILD_CONTEXT
        let context = build_context(&candidates);
        let prompt = build_full_prompt(question, &context);
        debug!(
            candidates = candidates.len(),
            prompt_chars = prompt.chars().count(),
            "Built prompt"
        );

        // GENERATE
        let request = ChatRequest::builder()
            .user(prompt)
            .image(image.map(str::to_string))
            .build();
        let generated = self.chat.chat(request).await;

        // ATTACH_SOURCES
        let sources = collect_citations(&candidates);

        let result = match generated {
            Ok(answer) => AnswerResult::answered(answer, sources),
            Err(e) => {
                warn!(
                    provider = self.chat.provider_name(),
                    error = %e,
                    "Generation failed, returning degraded answer"
                );
                AnswerResult::degraded(
                    format!("{}: {}", GENERATION_FAILURE_PREFIX, e),
                    e.to_string(),
                    sources,
                )
            }
        };

        info!(
            sources = result.sources.len(),
            degraded = result.is_degraded(),
            "Answer ready"
        );

        Ok(result)
    }
}
