//! Error types for batch classification.

use wordmatch_dtw::DtwError;

use crate::label::WordId;

/// Errors from batch classification.
#[derive(Debug, thiserror::Error)]
pub enum ClassifyError {
    /// Returned when the vocabulary size is zero.
    #[error("word count must be at least 1, got {word_count}")]
    InvalidWordCount {
        /// The invalid word count provided.
        word_count: u32,
    },

    /// Returned when the workspace capacity is zero or too large to allocate.
    #[error("capacity must be in 1..={max} frames, got {capacity}")]
    InvalidCapacity {
        /// The invalid capacity provided.
        capacity: usize,
        /// Largest accepted capacity.
        max: usize,
    },

    /// Returned when matching a pair broke an internal invariant.
    ///
    /// Invalid input never produces this variant; the offending pair is
    /// skipped instead.
    #[error("corrupt match of input {input} against template {template}")]
    CorruptMatch {
        /// Input word being classified.
        input: WordId,
        /// Template word being compared.
        template: WordId,
        /// Underlying invariant violation.
        source: DtwError,
    },

    /// Returned when the outcome reporter fails to accept a result.
    #[error("failed to report result for input {input}")]
    Report {
        /// Input word whose result was rejected.
        input: WordId,
        /// Reporter error.
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}
