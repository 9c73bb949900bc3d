//! Resilient completion client.
//!
//! Tries every (model, credential) pair once: models in priority order on
//! the outer loop, credentials on the inner loop. Any per-attempt failure
//! moves on to the next pair. The pair that last succeeded is tried first
//! on the next call.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::{Duration, Instant};

use tracing::{info, warn};

use crate::chat::{ChatMessage, ChatRequest, ModelProfile};
use crate::error::{AttemptError, InferenceError};
use crate::transport::{ChatTransport, Credential};

const NO_PREFERENCE: usize = usize::MAX;

/// A successful completion and where it came from.
#[derive(Debug, Clone)]
pub struct Completion {
    pub text: String,
    pub model: String,
    pub credential_index: usize,
    /// Attempts made, including the successful one.
    pub attempts: usize,
    pub elapsed: Duration,
}

/// Last successful (model, credential) indices. Advisory: concurrent
/// writers may race, which only affects ordering.
#[derive(Debug)]
struct PreferenceHint {
    model: AtomicUsize,
    credential: AtomicUsize,
}

impl PreferenceHint {
    fn new() -> Self {
        Self {
            model: AtomicUsize::new(NO_PREFERENCE),
            credential: AtomicUsize::new(NO_PREFERENCE),
        }
    }

    fn get(&self) -> Option<(usize, usize)> {
        let model = self.model.load(Ordering::Relaxed);
        let credential = self.credential.load(Ordering::Relaxed);
        (model != NO_PREFERENCE && credential != NO_PREFERENCE).then_some((model, credential))
    }

    fn set(&self, model: usize, credential: usize) {
        self.model.store(model, Ordering::Relaxed);
        self.credential.store(credential, Ordering::Relaxed);
    }
}

#[derive(Clone)]
pub struct ResilientClient {
    transport: Arc<dyn ChatTransport>,
    credentials: Vec<Credential>,
    models: Vec<ModelProfile>,
    preference: Arc<PreferenceHint>,
}

impl std::fmt::Debug for ResilientClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResilientClient")
            .field("credentials", &self.credentials)
            .field("models", &self.models)
            .field("preference", &self.preference.get())
            .finish()
    }
}

impl ResilientClient {
    pub fn new(
        transport: Arc<dyn ChatTransport>,
        credentials: Vec<Credential>,
        models: Vec<ModelProfile>,
    ) -> Self {
        Self {
            transport,
            credentials,
            models,
            preference: Arc::new(PreferenceHint::new()),
        }
    }

    /// A client sharing this one's transport and credentials but trying
    /// `models` instead, with its own preference hint.
    pub fn with_models(&self, models: Vec<ModelProfile>) -> Self {
        Self::new(self.transport.clone(), self.credentials.clone(), models)
    }

    pub fn models(&self) -> &[ModelProfile] {
        &self.models
    }

    pub fn credential_count(&self) -> usize {
        self.credentials.len()
    }

    /// Upper bound on sequential round trips for one `complete` call.
    pub fn max_attempts(&self) -> usize {
        self.models.len() * self.credentials.len()
    }

    /// The attempt order for the next call: the preferred pair first, then
    /// the full cross product with models outermost, each pair once.
    fn attempt_order(&self) -> Vec<(usize, usize)> {
        let mut order = Vec::with_capacity(self.max_attempts());
        let preferred = self
            .preference
            .get()
            .filter(|&(m, c)| m < self.models.len() && c < self.credentials.len());
        if let Some(pair) = preferred {
            order.push(pair);
        }
        for m in 0..self.models.len() {
            for c in 0..self.credentials.len() {
                if Some((m, c)) != preferred {
                    order.push((m, c));
                }
            }
        }
        order
    }

    /// Send `messages` to each candidate in turn until one answers.
    pub async fn complete(&self, messages: &[ChatMessage]) -> Result<Completion, InferenceError> {
        if self.credentials.is_empty() {
            return Err(InferenceError::NoCredentials);
        }
        if self.models.is_empty() {
            return Err(InferenceError::NoModels);
        }

        let start = Instant::now();
        let order = self.attempt_order();
        let total = order.len();
        let mut last: Option<AttemptError> = None;

        for (attempt, (m, c)) in order.into_iter().enumerate() {
            let profile = &self.models[m];
            let credential = &self.credentials[c];
            let request = ChatRequest::new(profile, messages.to_vec());

            match self.transport.complete(credential, &request).await {
                Ok(text) => {
                    self.preference.set(m, c);
                    info!(
                        model = %profile.id,
                        credential = %credential,
                        attempt = attempt + 1,
                        total,
                        "completion succeeded"
                    );
                    return Ok(Completion {
                        text,
                        model: profile.id.clone(),
                        credential_index: c,
                        attempts: attempt + 1,
                        elapsed: start.elapsed(),
                    });
                }
                Err(e) => {
                    warn!(
                        model = %profile.id,
                        credential = %credential,
                        attempt = attempt + 1,
                        total,
                        cause = %e.kind,
                        detail = %e.detail,
                        "completion attempt failed, trying next candidate"
                    );
                    last = Some(e);
                }
            }
        }

        Err(InferenceError::AllProvidersExhausted {
            attempts: total,
            last,
        })
    }
}
