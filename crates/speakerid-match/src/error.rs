use speakerid_dtw::DtwError;

/// Errors from template bank construction and identification.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// Returned when a speaker identifier is empty.
    #[error("speaker id must not be empty")]
    EmptySpeakerId,

    /// Returned when a template bank is built from zero templates.
    #[error("template bank must contain at least one template")]
    EmptyBank,

    /// Returned when a template's frame dimension differs from the rest of the bank.
    #[error("template {index} (\"{name}\") has dimension {got}, bank dimension is {expected}")]
    InconsistentTemplate {
        /// Position of the offending template.
        index: usize,
        /// Name of the offending template.
        name: String,
        /// Dimension shared by the earlier templates.
        expected: usize,
        /// Dimension of the offending template.
        got: usize,
    },

    /// Returned when the candidate's frame dimension differs from the bank's.
    #[error("candidate has dimension {got}, template bank dimension is {expected}")]
    DimensionMismatch {
        /// Dimension of the template bank.
        expected: usize,
        /// Dimension of the candidate sequence.
        got: usize,
    },

    /// Returned when the rejection threshold is negative or NaN.
    #[error("rejection threshold must be non-negative, got {value}")]
    InvalidThreshold {
        /// The rejected threshold.
        value: f64,
    },

    /// Wraps a DTW error encountered while scoring a template.
    #[error("DTW error while scoring template: {0}")]
    Dtw(#[from] DtwError),
}
