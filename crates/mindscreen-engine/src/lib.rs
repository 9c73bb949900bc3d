//! mindscreen-engine
//!
//! The single entry point around the screening core:
//! [`AssessmentEngine::process_assessment`] turns raw answers and optional
//! user context into one immutable composite result. Also owns the
//! on-disk engine settings and the response-quality heuristics.

pub mod config;
pub mod error;
pub mod orchestrator;
pub mod quality;

pub use config::EngineSettings;
pub use error::EngineError;
pub use orchestrator::AssessmentEngine;
