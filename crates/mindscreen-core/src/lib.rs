//! mindscreen-core
//!
//! Pure domain types for screening results and AI insights.
//! No I/O. This is the shared vocabulary of the other MindScreen crates.

pub mod error;
pub mod models;
