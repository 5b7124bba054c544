//! Claude API client for one-shot completions.

use std::{sync::Arc, time::Duration};

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use secrecy::ExposeSecret;
use tracing::instrument;

use crate::config::ClaudeConfig;

use super::error::ClaudeError;
use super::types::{ChatRequest, ChatResponse, Message};

const ANTHROPIC_VERSION: &str = "2023-06-01";
const DEFAULT_MAX_TOKENS: u32 = 1024;
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Claude API client.
#[derive(Clone)]
pub struct ClaudeClient {
    inner: Arc<ClaudeClientInner>,
}

struct ClaudeClientInner {
    client: reqwest::Client,
    model: String,
    api_url: String,
}

impl ClaudeClient {
    /// Create a new Claude client.
    ///
    /// # Errors
    ///
    /// Returns `ClaudeError::Config` if the API key is not a valid header
    /// value, or `ClaudeError::Http` if the HTTP client cannot be built.
    pub fn new(config: &ClaudeConfig) -> Result<Self, ClaudeError> {
        let api_key = HeaderValue::from_str(config.api_key.expose_secret())
            .map_err(|_| ClaudeError::Config("API key is not a valid header value".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert("x-api-key", api_key);
        headers.insert(
            "anthropic-version",
            HeaderValue::from_static(ANTHROPIC_VERSION),
        );

        let client = reqwest::Client::builder()
            .default_headers(headers)
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            inner: Arc::new(ClaudeClientInner {
                client,
                model: config.model.clone(),
                api_url: config.api_url.clone(),
            }),
        })
    }

    /// Model this client sends requests to.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.inner.model
    }

    /// Send a chat request and wait for the complete response.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails or returns an error response.
    #[instrument(skip(self, messages, system), fields(model = %self.inner.model))]
    pub async fn chat(
        &self,
        messages: Vec<Message>,
        system: Option<String>,
    ) -> Result<ChatResponse, ClaudeError> {
        let request = ChatRequest {
            model: self.inner.model.clone(),
            max_tokens: DEFAULT_MAX_TOKENS,
            messages,
            system,
        };

        let response = self
            .inner
            .client
            .post(&self.inner.api_url)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if status.is_success() {
            let body = response.text().await?;
            serde_json::from_str(&body)
                .map_err(|e| ClaudeError::Parse(format!("Failed to parse response: {e}")))
        } else {
            Err(error_from_status(status, response).await)
        }
    }
}

/// Map a non-success response onto a `ClaudeError`.
async fn error_from_status(status: reqwest::StatusCode, response: reqwest::Response) -> ClaudeError {
    let retry_after = response
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    match response.text().await {
        Ok(body) => ClaudeError::from_reply(status, retry_after.as_deref(), body),
        Err(e) => ClaudeError::Http(e),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use secrecy::SecretString;

    use super::*;

    fn config(api_key: &str) -> ClaudeConfig {
        ClaudeConfig {
            api_key: SecretString::from(api_key.to_string()),
            model: "claude-sonnet-4-20250514".to_string(),
            api_url: "http://127.0.0.1:9/v1/messages".to_string(),
        }
    }

    #[test]
    fn test_new_rejects_unprintable_key() {
        let err = ClaudeClient::new(&config("sk-ant\nbroken")).err().unwrap();
        assert!(matches!(err, ClaudeError::Config(_)));
    }

    #[test]
    fn test_new_keeps_model() {
        let client = ClaudeClient::new(&config("sk-ant-api03-abc")).unwrap();
        assert_eq!(client.model(), "claude-sonnet-4-20250514");
    }

    #[tokio::test]
    async fn test_unreachable_endpoint_is_http_error() {
        let client = ClaudeClient::new(&config("sk-ant-api03-abc")).unwrap();
        let err = client
            .chat(vec![Message::user("hello")], None)
            .await
            .unwrap_err();
        assert!(matches!(err, ClaudeError::Http(_)));
    }
}
