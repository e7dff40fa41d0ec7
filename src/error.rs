//! Unified error hierarchy for the summarization engine.
//!
//! The analytical pipeline is deliberately forgiving: sparse data, empty
//! windows, and missing optional metrics all resolve to documented neutral
//! defaults rather than errors, so a summary can always be produced for a
//! user with thin history. The only conditions surfaced as errors are
//! caller-side contract violations.

use thiserror::Error;

/// Top-level error type for all engine operations
#[derive(Debug, Error, PartialEq)]
pub enum AnalysisError {
    /// Paired series handed to a correlation must have equal lengths
    #[error("mismatched series lengths: {left} vs {right}")]
    MismatchedSeries { left: usize, right: usize },
}

/// Convenience Result type for engine operations
pub type Result<T> = std::result::Result<T, AnalysisError>;
