//! Answer payload returned by the pipeline

use serde::{Deserialize, Serialize};

use super::SourceCitation;

/// How the answer text came about
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum GenerationOutcome {
    /// The model replied; the text is its answer (possibly a designed refusal)
    #[default]
    Answered,
    /// Generation failed; the text describes the failure
    Degraded { error: String },
}

/// Terminal output of the answer pipeline
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerResult {
    pub answer: String,
    pub sources: Vec<SourceCitation>,
    #[serde(skip)]
    pub outcome: GenerationOutcome,
}

impl AnswerResult {
    pub fn answered(answer: impl Into<String>, sources: Vec<SourceCitation>) -> Self {
        Self {
            answer: answer.into(),
            sources,
            outcome: GenerationOutcome::Answered,
        }
    }

    pub fn degraded(
        answer: impl Into<String>,
        error: impl Into<String>,
        sources: Vec<SourceCitation>,
    ) -> Self {
        Self {
            answer: answer.into(),
            sources,
            outcome: GenerationOutcome::Degraded {
                error: error.into(),
            },
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self.outcome, GenerationOutcome::Degraded { .. })
    }
}
