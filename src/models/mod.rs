//! Data models module
//!
//! Contains the per-run result record, run status flags, and the aggregated
//! sweep report consumed by the presentation layer.

pub mod result;

// Re-export commonly used types
pub use result::{Report, RunRecord, RunStatus};
