//! Source citations attached to answers

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::domain::knowledge_base::RetrievedCandidate;

/// A document cited as the source of an answer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceCitation {
    pub id: String,
    pub filename: String,
    pub source: Option<String>,
    /// Distance of the cited chunk, lower is more similar
    pub score: f64,
}

impl SourceCitation {
    /// Citation for a candidate, `None` unless it carries a non-null filename
    pub fn from_candidate(candidate: &RetrievedCandidate) -> Option<Self> {
        let filename = candidate.filename()?;

        Some(Self {
            id: candidate.id.clone(),
            filename,
            source: candidate.source(),
            score: candidate.distance,
        })
    }
}

/// Derive citations from candidates in retrieval order.
///
/// Chunks from the same file collapse into one citation; the first occurrence
/// wins. Candidates without a filename are never cited.
pub fn collect_citations(candidates: &[RetrievedCandidate]) -> Vec<SourceCitation> {
    let mut seen = HashSet::new();

    candidates
        .iter()
        .filter_map(SourceCitation::from_candidate)
        .filter(|citation| seen.insert(citation.filename.clone()))
        .collect()
}
