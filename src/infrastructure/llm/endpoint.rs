//! Endpoint resolution for OpenAI-compatible servers
//!
//! Deployed servers mount their chat route inconsistently (`/v1/chat/completions`,
//! `/chat/completions`, `/v1/chat`, `/chat`), so chat calls probe a short list
//! of candidates derived from one configured base URL. A 404 means "wrong path,
//! try the next one"; anything else means the path was reached and the error is
//! real, so probing stops there.

use std::time::Duration;

use tracing::debug;

use super::http_client::HttpClientTrait;
use crate::domain::DomainError;

const CHAT_COMPLETIONS_PATH: &str = "/chat/completions";
const CHAT_PATH: &str = "/chat";
const EMBEDDINGS_PATH: &str = "/embeddings";

/// Strip an accidentally included endpoint path and trailing slashes
pub fn normalize_base_url(url: &str) -> String {
    let trimmed = url.trim().trim_end_matches('/');

    let without_endpoint = trimmed
        .strip_suffix(EMBEDDINGS_PATH)
        .or_else(|| trimmed.strip_suffix(CHAT_COMPLETIONS_PATH))
        .unwrap_or(trimmed);

    without_endpoint.trim_end_matches('/').to_string()
}

/// Base URL with its trailing version segment (`/v1`, `/v4`, ...) removed, if it has one
fn strip_version_segment(base: &str) -> Option<&str> {
    let path_start = base.find("://").map(|i| i + 3).unwrap_or(0);
    let (prefix, segment) = base[path_start..].rsplit_once('/')?;

    let is_version = segment.len() > 1
        && segment.starts_with('v')
        && segment[1..].chars().all(|c| c.is_ascii_digit());

    if is_version {
        Some(&base[..path_start + prefix.len()])
    } else {
        None
    }
}

/// A chat candidate that answered successfully
#[derive(Debug, Clone)]
pub struct ProbeHit {
    pub url: String,
    pub response: serde_json::Value,
}

/// Derives chat/embedding URLs from a single base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EndpointResolver {
    base_url: String,
}

impl EndpointResolver {
    pub fn new(base_url: impl AsRef<str>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.as_ref()),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat URLs in probing order
    pub fn chat_candidates(&self) -> Vec<String> {
        let base = self.base_url.as_str();
        let unversioned = strip_version_segment(base);

        let mut candidates = vec![format!("{}{}", base, CHAT_COMPLETIONS_PATH)];
        if let Some(stripped) = unversioned {
            candidates.push(format!("{}{}", stripped, CHAT_COMPLETIONS_PATH));
        }
        candidates.push(format!("{}{}", base, CHAT_PATH));
        if let Some(stripped) = unversioned {
            candidates.push(format!("{}{}", stripped, CHAT_PATH));
        }

        candidates
    }

    /// The single embeddings URL; embeddings are never probed
    pub fn embeddings_url(&self) -> String {
        format!("{}{}", self.base_url, EMBEDDINGS_PATH)
    }

    /// POST `body` to each chat candidate until one is routed.
    ///
    /// Only a 404 moves on to the next candidate. Any other status, a
    /// connection failure or a timeout ends probing with that error.
    pub async fn probe_chat(
        &self,
        client: &dyn HttpClientTrait,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<ProbeHit, DomainError> {
        let candidates = self.chat_candidates();
        let mut last_error = String::new();

        for url in &candidates {
            debug!(url = %url, "Trying chat endpoint");

            match client.post_json(url, headers.clone(), body, timeout).await {
                Ok(response) => {
                    return Ok(ProbeHit {
                        url: url.clone(),
                        response,
                    })
                }
                Err(e) if e.is_not_found() => {
                    debug!(url = %url, "Chat endpoint not found, trying next candidate");
                    last_error = format!("404 Not Found at {}", url);
                }
                Err(e) => {
                    debug!(url = %url, error = %e, "Chat endpoint reached but request failed");
                    return Err(e);
                }
            }
        }

        Err(DomainError::routing(candidates, last_error))
    }
}
