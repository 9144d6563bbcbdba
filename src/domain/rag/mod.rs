//! Retrieval-augmented answering: prompt policy, citations and answer payload

mod answer;
mod citation;
mod prompt;

pub use answer::{AnswerResult, GenerationOutcome};
pub use citation::{collect_citations, SourceCitation};
pub use prompt::{
    build_context, build_full_prompt, build_user_prompt, NO_CONTEXT_MARKER, STANDARD_REFUSAL,
    SYSTEM_PROMPT,
};
