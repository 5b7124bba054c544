//! Failures talking to the Messages API.

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Error)]
pub enum ClaudeError {
    #[error("request to Claude failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Claude returned {status} ({kind}): {message}")]
    Api {
        status: u16,
        kind: String,
        message: String,
    },

    #[error("Claude rate limit hit, retry in {0}s")]
    RateLimited(u64),

    /// The configured key was refused.
    #[error("Claude rejected the API key")]
    Unauthorized,

    #[error("unreadable Claude response: {0}")]
    Parse(String),

    #[error("Claude client misconfigured: {0}")]
    Config(String),
}

#[derive(Deserialize)]
struct Envelope {
    error: Detail,
}

#[derive(Deserialize)]
struct Detail {
    #[serde(rename = "type")]
    kind: String,
    message: String,
}

impl ClaudeError {
    /// Classify a non-2xx reply. Bodies that are not the JSON error
    /// envelope are kept verbatim under kind `unknown`.
    pub(super) fn from_reply(status: StatusCode, retry_after: Option<&str>, body: String) -> Self {
        match status {
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited(
                retry_after
                    .and_then(|v| v.trim().parse().ok())
                    .unwrap_or(DEFAULT_RETRY_AFTER_SECS),
            ),
            StatusCode::UNAUTHORIZED => Self::Unauthorized,
            _ => {
                let (kind, message) = match serde_json::from_str::<Envelope>(&body) {
                    Ok(Envelope { error }) => (error.kind, error.message),
                    Err(_) => ("unknown".to_string(), body),
                };
                Self::Api {
                    status: status.as_u16(),
                    kind,
                    message,
                }
            }
        }
    }
}
