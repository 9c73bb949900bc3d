//! mindscreen-inference
//!
//! Everything between a scored assessment and its AI insights: prompt
//! construction, the chat transport seam, the resilient completion client
//! (models outer, credentials inner), lenient response normalization and
//! the static fallback content. The location resource lookup and IP
//! geolocation run on the same machinery.

pub mod analysis;
pub mod chat;
pub mod client;
pub mod error;
pub mod fallback;
pub mod geolocation;
pub mod location;
pub mod normalize;
pub mod prompt;
pub mod transport;

pub use client::{Completion, ResilientClient};
pub use error::InferenceError;
pub use fallback::{DegradationReason, fallback};
pub use normalize::normalize;
pub use transport::{ChatTransport, Credential, HttpTransport};
