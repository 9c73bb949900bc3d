//! HTTP transport for chat-completion endpoints.
//!
//! [`ChatTransport`] is the seam between the resilient client and the
//! network. [`HttpTransport`] posts to an OpenAI-compatible
//! `/chat/completions` endpoint with a bearer token; tests substitute
//! scripted transports.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::chat::{ChatRequest, ChatResponseRaw};
use crate::error::{AttemptError, AttemptFailure, InferenceError};

pub const DEFAULT_BASE_URL: &str = "https://models.github.ai/inference";
pub const DEFAULT_COMPLETIONS_PATH: &str = "/chat/completions";

/// Placeholder value shipped in sample environment files.
pub const PLACEHOLDER_CREDENTIAL: &str = "your_github_models_api_key_here";

/// An opaque API credential. `Debug` and `Display` show a redacted form.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a raw key. Blank values and the sample placeholder yield `None`.
    pub fn parse(raw: &str) -> Option<Self> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed == PLACEHOLDER_CREDENTIAL {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Keep usable credentials, preserving order.
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Vec<Credential> {
        raw.iter().filter_map(|r| Credential::parse(r.as_ref())).collect()
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    pub fn redacted(&self) -> String {
        redact(&self.0)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.redacted())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Redact a secret for display: first 4 and last 4 characters.
pub fn redact(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }
    let prefix: String = chars[..4].iter().collect();
    let suffix: String = chars[chars.len() - 4..].iter().collect();
    format!("{prefix}...{suffix}")
}

/// Where completion requests are sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Endpoint {
    pub base_url: String,
    pub path: String,
}

impl Default for Endpoint {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            path: DEFAULT_COMPLETIONS_PATH.to_string(),
        }
    }
}

impl Endpoint {
    pub fn url(&self) -> String {
        let base = self.base_url.trim_end_matches('/');
        if self.path.starts_with('/') {
            format!("{base}{}", self.path)
        } else {
            format!("{base}/{}", self.path)
        }
    }
}

/// One chat-completion round trip. Implementations classify every failure
/// into an [`AttemptError`] and return the first choice's text on success.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<String, AttemptError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    http_client: reqwest::Client,
    endpoint: Endpoint,
}

impl HttpTransport {
    pub fn new(endpoint: Endpoint, timeout: Option<Duration>) -> Result<Self, InferenceError> {
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder
            .build()
            .map_err(|e| InferenceError::Client(e.to_string()))?;
        Ok(Self {
            http_client,
            endpoint,
        })
    }

    pub fn endpoint(&self) -> &Endpoint {
        &self.endpoint
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(
        &self,
        credential: &Credential,
        request: &ChatRequest,
    ) -> Result<String, AttemptError> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(self.endpoint.url())
            .header("Authorization", format!("Bearer {}", credential.expose()))
            .header("Content-Type", "application/json")
            .json(request)
            .send()
            .await
            .map_err(|e| AttemptError::new(AttemptFailure::Network, e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            return Err(AttemptError::from_status(status.as_u16(), &error_text));
        }

        let raw: ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| AttemptError::new(AttemptFailure::MalformedBody, e.to_string()))?;

        let content = raw.first_content().ok_or_else(|| {
            AttemptError::new(AttemptFailure::EmptyContent, "no content in first choice")
        })?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis() as u64,
            "chat completion"
        );

        Ok(content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_and_blank_credentials_are_dropped() {
        let creds = Credential::parse_all(&["", "  ", PLACEHOLDER_CREDENTIAL, "ghp_abcdefghijkl"]);
        assert_eq!(creds.len(), 1);
        assert_eq!(creds[0].expose(), "ghp_abcdefghijkl");
    }

    #[test]
    fn debug_never_shows_the_secret() {
        let cred = Credential::parse("ghp_abcdefghijkl").unwrap();
        let shown = format!("{cred:?} {cred}");
        assert!(!shown.contains("abcdefgh"));
        assert!(shown.contains("ghp_...ijkl"));
        assert_eq!(redact("short"), "****");
    }

    #[test]
    fn endpoint_url_joins_cleanly() {
        let endpoint = Endpoint {
            base_url: "https://example.test/inference/".into(),
            path: "chat/completions".into(),
        };
        assert_eq!(endpoint.url(), "https://example.test/inference/chat/completions");
        assert_eq!(
            Endpoint::default().url(),
            "https://models.github.ai/inference/chat/completions"
        );
    }
}
