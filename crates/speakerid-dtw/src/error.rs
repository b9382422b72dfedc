//! Error types for frame construction and DTW computation.

/// Errors from frame/sequence validation and DTW parameter checks.
///
/// These are caller-contract violations. A sequence pair that simply has no
/// acceptable alignment is not an error; see [`crate::DtwOutcome`].
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DtwError {
    /// Returned when a frame is built from an empty coefficient vector.
    #[error("frame must have at least one coefficient")]
    EmptyFrame,

    /// Returned when a frame contains NaN, infinity, or negative infinity.
    #[error("frame contains non-finite coefficient at index {index}")]
    NonFiniteValue {
        /// Position of the first non-finite coefficient found.
        index: usize,
    },

    /// Returned when a frame added to a sequence has the wrong dimension.
    #[error("frame {index} has {got} coefficients, sequence dimension is {expected}")]
    InconsistentFrame {
        /// Position of the offending frame in the sequence.
        index: usize,
        /// Dimension declared by the sequence.
        expected: usize,
        /// Dimension of the offending frame.
        got: usize,
    },

    /// Returned when two frames or sequences being compared differ in dimension.
    #[error("dimension mismatch: expected {expected} coefficients, got {got}")]
    DimensionMismatch {
        /// Dimension of the left-hand operand.
        expected: usize,
        /// Dimension of the right-hand operand.
        got: usize,
    },

    /// Returned when a numeric parameter is negative or NaN.
    #[error("invalid parameter {name}: {value} (must be non-negative)")]
    InvalidParameter {
        /// Name of the rejected parameter.
        name: &'static str,
        /// The rejected value.
        value: f64,
    },
}
