//! Error types for feature sequences and DP matching.

/// Errors from feature sequence validation and DP matching.
///
/// Every variant except [`DtwError::CorruptState`] describes invalid input:
/// the offending sequence or pair can be skipped and the caller carries on.
/// `CorruptState` signals a broken internal invariant and should abort the
/// current match.
#[derive(Debug, thiserror::Error)]
pub enum DtwError {
    /// Returned when a sequence has no frames.
    #[error("feature sequence must have at least one frame")]
    EmptySequence,

    /// Returned when a sequence is built with zero-length feature vectors.
    #[error("feature dimension must be at least 1")]
    ZeroDimension,

    /// Returned when a frame's length differs from the first frame's length.
    #[error("frame {frame} has {got} values, expected {expected}")]
    RaggedFrame {
        /// Index of the offending frame.
        frame: usize,
        /// Dimension established by the first frame.
        expected: usize,
        /// Number of values found in this frame.
        got: usize,
    },

    /// Returned when a feature value is NaN or infinite.
    #[error("non-finite value at frame {frame}, dimension {dim}")]
    NonFiniteValue {
        /// Frame index of the first non-finite value.
        frame: usize,
        /// Dimension index within that frame.
        dim: usize,
    },

    /// Returned when template and input vectors have different dimensions.
    #[error("dimension mismatch: template has {template}, input has {input}")]
    DimensionMismatch {
        /// Feature dimension of the template.
        template: usize,
        /// Feature dimension of the input.
        input: usize,
    },

    /// Returned when a sequence is longer than the cost matrix can hold.
    #[error("sequence of {frames} frames exceeds capacity of {capacity}")]
    CapacityExceeded {
        /// Frame count of the offending sequence.
        frames: usize,
        /// Maximum frame count supported.
        capacity: usize,
    },

    /// Returned when the diagonal weight is negative, NaN, or infinite.
    #[error("diagonal weight must be finite and non-negative, got {weight}")]
    InvalidWeight {
        /// The rejected weight.
        weight: f64,
    },

    /// Returned when the back-pointer walk hits a broken link.
    #[error("corrupt back-pointer state at ({row}, {col}): {reason}")]
    CorruptState {
        /// Template frame index of the failing cell.
        row: usize,
        /// Input frame index of the failing cell.
        col: usize,
        /// What was wrong with the cell.
        reason: &'static str,
    },
}

impl DtwError {
    /// Return true for errors caused by the caller's data rather than a bug.
    #[must_use]
    pub fn is_invalid_input(&self) -> bool {
        !matches!(self, Self::CorruptState { .. })
    }
}
