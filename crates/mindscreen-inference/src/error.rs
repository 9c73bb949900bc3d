use std::fmt;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum InferenceError {
    /// Every (model, credential) pair was tried once and none succeeded.
    #[error("all providers exhausted after {attempts} attempt(s); last failure: {}", describe_last(.last))]
    AllProvidersExhausted {
        attempts: usize,
        last: Option<AttemptError>,
    },

    #[error("no usable credentials configured")]
    NoCredentials,

    #[error("no candidate models configured")]
    NoModels,

    #[error("no JSON object found in model response")]
    UnparsableResponse,

    #[error("HTTP client setup failed: {0}")]
    Client(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

fn describe_last(last: &Option<AttemptError>) -> String {
    last.as_ref()
        .map_or_else(|| "none".to_string(), ToString::to_string)
}

impl InferenceError {
    /// True when the cross product was exhausted and the final attempt was
    /// rejected for rate limiting.
    pub fn is_rate_limited(&self) -> bool {
        matches!(
            self,
            InferenceError::AllProvidersExhausted {
                last: Some(AttemptError {
                    kind: AttemptFailure::RateLimited,
                    ..
                }),
                ..
            }
        )
    }
}

/// Classification of a single failed completion attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttemptFailure {
    RateLimited,
    Network,
    Status(u16),
    MalformedBody,
    EmptyContent,
}

impl fmt::Display for AttemptFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttemptFailure::RateLimited => f.write_str("rate_limited"),
            AttemptFailure::Network => f.write_str("network"),
            AttemptFailure::Status(code) => write!(f, "status_{code}"),
            AttemptFailure::MalformedBody => f.write_str("malformed_body"),
            AttemptFailure::EmptyContent => f.write_str("empty_content"),
        }
    }
}

#[derive(Debug, Clone, Error)]
#[error("{kind}: {detail}")]
pub struct AttemptError {
    pub kind: AttemptFailure,
    pub detail: String,
}

impl AttemptError {
    pub fn new(kind: AttemptFailure, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    /// Classify a non-2xx response. 429 or a body mentioning rate limits
    /// counts as rate limiting.
    pub fn from_status(status: u16, body: &str) -> Self {
        let kind = if status == 429 || body.to_lowercase().contains("rate limit") {
            AttemptFailure::RateLimited
        } else {
            AttemptFailure::Status(status)
        };
        Self::new(kind, body.chars().take(300).collect::<String>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_classification() {
        assert_eq!(AttemptError::from_status(429, "").kind, AttemptFailure::RateLimited);
        assert_eq!(
            AttemptError::from_status(403, "Rate limit of 10 per 60s exceeded").kind,
            AttemptFailure::RateLimited
        );
        assert_eq!(AttemptError::from_status(500, "oops").kind, AttemptFailure::Status(500));
    }

    #[test]
    fn exhaustion_reports_rate_limiting() {
        let err = InferenceError::AllProvidersExhausted {
            attempts: 4,
            last: Some(AttemptError::new(AttemptFailure::RateLimited, "429")),
        };
        assert!(err.is_rate_limited());
        assert!(err.to_string().contains("4 attempt(s)"));

        let err = InferenceError::AllProvidersExhausted {
            attempts: 1,
            last: Some(AttemptError::new(AttemptFailure::Network, "refused")),
        };
        assert!(!err.is_rate_limited());
    }
}
