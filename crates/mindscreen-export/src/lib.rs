//! mindscreen-export
//!
//! Markdown report rendering for a processed assessment.

pub mod error;
pub mod render;
pub mod report;

pub use report::{render_report, report_id};
