use std::time::Duration;

use async_trait::async_trait;

use crate::domain::DomainError;

/// Longest response excerpt carried inside an error
const ERROR_BODY_LIMIT: usize = 500;

/// Trait for HTTP client operations (for mocking)
#[async_trait]
pub trait HttpClientTrait: Send + Sync + std::fmt::Debug {
    /// POST a JSON body and decode a JSON response.
    ///
    /// Non-success statuses come back as [`DomainError::Http`], connection
    /// failures and timeouts as [`DomainError::Transport`].
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value, DomainError>;
}

/// Real HTTP client using reqwest
#[derive(Debug, Clone, Default)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl HttpClientTrait for HttpClient {
    async fn post_json(
        &self,
        url: &str,
        headers: Vec<(&str, &str)>,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<serde_json::Value, DomainError> {
        let mut request = self.client.post(url).timeout(timeout);

        for (key, value) in headers {
            request = request.header(key, value);
        }

        let response = request.json(body).send().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::timeout(url, format!("Request timed out after {:?}: {}", timeout, e))
            } else {
                DomainError::transport(url, format!("Request failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(status_error(url, status.as_u16(), response.text().await));
        }

        let text = response.text().await.map_err(|e| {
            if e.is_timeout() {
                DomainError::timeout(url, format!("Reading response timed out: {}", e))
            } else {
                DomainError::transport(url, format!("Failed to read response: {}", e))
            }
        })?;

        serde_json::from_str(&text).map_err(|e| {
            DomainError::protocol(
                format!("response from {} is not JSON: {}", url, e),
                truncate(&text, ERROR_BODY_LIMIT),
            )
        })
    }
}

/// Error for a non-success status. An unreadable body becomes empty so the
/// status itself, 404 included, still reaches the caller.
fn status_error<E>(url: &str, status: u16, body: Result<String, E>) -> DomainError {
    let body = body.unwrap_or_default();
    DomainError::http(url, status, truncate(&body, ERROR_BODY_LIMIT))
}

/// Cut `text` to at most `limit` characters
pub(crate) fn truncate(text: &str, limit: usize) -> String {
    text.chars().take(limit).collect()
}


#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn test_truncate_counts_characters() {
        assert_eq!(truncate("登录失败了", 2), "登录");
        assert_eq!(truncate("abc", 10), "abc");
    }

    #[test]
    fn test_unreadable_error_body_keeps_status() {
        let missing = status_error("http://llm/v1/chat/completions", 404, Err("connection reset"));
        assert!(missing.is_not_found());
        match missing {
            DomainError::Http { status, body, .. } => {
                assert_eq!(status, 404);
                assert!(body.is_empty());
            }
            other => panic!("unexpected error: {:?}", other),
        }

        let broken = status_error::<()>("http://llm/x", 502, Ok("bad gateway".into()));
        assert!(!broken.is_not_found());
    }

    #[tokio::test]
    async fn test_post_json_success() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/embeddings"))
            .and(header("Authorization", "Bearer k"))
            .and(body_json(serde_json::json!({"model": "m", "input": "hi"})))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({"ok": true})))
            .expect(1)
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let url = format!("{}/v1/embeddings", server.uri());
        let response = client
            .post_json(
                &url,
                vec![("Authorization", "Bearer k")],
                &serde_json::json!({"model": "m", "input": "hi"}),
                Duration::from_secs(5),
            )
            .await
            .unwrap();

        assert_eq!(response["ok"], true);
    }

    #[tokio::test]
    async fn test_post_json_maps_status_errors() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;
        Mock::given(method("POST"))
            .and(path("/broken"))
            .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
            .mount(&server)
            .await;

        let client = HttpClient::new();
        let body = serde_json::json!({});

        let missing = client
            .post_json(&format!("{}/missing", server.uri()), vec![], &body, Duration::from_secs(5))
            .await
            .unwrap_err();
        assert!(missing.is_not_found());

        let broken = client
            .post_json(&format!("{}/broken", server.uri()), vec![], &body, Duration::from_secs(5))
            .await
            .unwrap_err();
        match broken {
            DomainError::Http { status, body, .. } => {
                assert_eq!(status, 500);
                assert_eq!(body, "internal");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_post_json_timeout() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(serde_json::json!({}))
                    .set_delay(Duration::from_millis(500)),
            )
            .mount(&server)
            .await;

        let error = HttpClient::new()
            .post_json(
                &format!("{}/slow", server.uri()),
                vec![],
                &serde_json::json!({}),
                Duration::from_millis(50),
            )
            .await
            .unwrap_err();

        assert!(error.is_timeout());
    }

    #[tokio::test]
    async fn test_post_json_non_json_body_is_protocol_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(200).set_body_string("<html>ok</html>"))
            .mount(&server)
            .await;

        let error = HttpClient::new()
            .post_json(&server.uri(), vec![], &serde_json::json!({}), Duration::from_secs(5))
            .await
            .unwrap_err();

        assert!(matches!(error, DomainError::Protocol { .. }));
    }
}
