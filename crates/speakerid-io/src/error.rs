//! I/O error types for speakerid-io.

use std::path::PathBuf;

use speakerid_dtw::DtwError;
use speakerid_match::MatchError;

/// Errors from sequence files, template directories, and result serialization.
#[derive(Debug, thiserror::Error)]
pub enum IoError {
    /// Returned when the input file does not exist or is unreadable.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when the CSV parser encounters a malformed record.
    #[error("CSV parse error in {path} at byte offset {offset}")]
    CsvParse {
        /// Path to the CSV file.
        path: PathBuf,
        /// Byte offset where the error occurred.
        offset: u64,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the CSV file contains a header but zero frames.
    #[error("empty sequence (no frames) in {path}")]
    EmptySequence {
        /// Path to the CSV file.
        path: PathBuf,
    },

    /// Returned when a frame row has a different number of columns than the header.
    #[error("inconsistent row length in {path}: row {row_index} has {got} columns, expected {expected}")]
    InconsistentRowLength {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Expected number of columns (from header).
        expected: usize,
        /// Actual number of columns in this row.
        got: usize,
    },

    /// Returned when a cell value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: row {row_index}, column {col_index}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the CSV file.
        path: PathBuf,
        /// Zero-based row index (excluding header).
        row_index: usize,
        /// Zero-based column index.
        col_index: usize,
        /// The raw string value that failed to parse.
        raw: String,
    },

    /// Returned when the file's coefficient count differs from the expected frame dimension.
    #[error("{path} has {got} coefficients per frame, expected {expected}")]
    DimensionMismatch {
        /// Path to the CSV file.
        path: PathBuf,
        /// Expected frame dimension.
        expected: usize,
        /// Number of columns in the header.
        got: usize,
    },

    /// Returned when the parsed rows do not form a valid sequence.
    #[error("invalid sequence in {path}")]
    Sequence {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying kernel error.
        source: DtwError,
    },

    /// Returned when a template directory cannot be listed.
    #[error("cannot read directory {path}")]
    ReadDir {
        /// Directory that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a template root holds no `<speaker>/<take>.csv` files.
    #[error("no templates found under {path}")]
    NoTemplates {
        /// Template root directory.
        path: PathBuf,
    },

    /// Returned when the loaded templates do not form a valid bank.
    #[error("invalid template bank: {0}")]
    Bank(#[from] MatchError),

    /// Returned when the run name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid run name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidRunName {
        /// The invalid name.
        name: String,
    },

    /// Returned when the output directory cannot be created.
    #[error("cannot create output directory {path}")]
    OutputDirCreate {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a result artifact cannot be serialized.
    #[error("cannot serialize result for {path}")]
    Serialize {
        /// Destination of the artifact.
        path: PathBuf,
        /// Underlying serializer error.
        source: serde_json::Error,
    },

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
}
