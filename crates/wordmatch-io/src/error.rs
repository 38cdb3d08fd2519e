//! I/O error types for wordmatch-io.

use std::path::PathBuf;

use wordmatch_dtw::DtwError;

/// Errors from sequence file loading and result serialization.
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

    /// Returned when the file ends before the two header lines and the
    /// frame-count line.
    #[error("missing header line {line} in {path}")]
    MissingHeader {
        /// Path to the sequence file.
        path: PathBuf,
        /// One-based line number that was expected.
        line: usize,
    },

    /// Returned when the frame-count line does not start with an integer.
    #[error("invalid frame count \"{raw}\" in {path}")]
    InvalidFrameCount {
        /// Path to the sequence file.
        path: PathBuf,
        /// The raw frame-count line.
        raw: String,
    },

    /// Returned when the declared frame count is zero.
    #[error("zero frames declared in {path}")]
    ZeroFrames {
        /// Path to the sequence file.
        path: PathBuf,
    },

    /// Returned when the declared frame count exceeds the reader capacity.
    #[error("{path} declares {frames} frames, capacity is {capacity}")]
    TooManyFrames {
        /// Path to the sequence file.
        path: PathBuf,
        /// Declared frame count.
        frames: usize,
        /// Configured frame capacity.
        capacity: usize,
    },

    /// Returned when the values after the frame-count line are not UTF-8.
    #[error("values in {path} are not valid UTF-8")]
    InvalidEncoding {
        /// Path to the sequence file.
        path: PathBuf,
        /// Decoding error.
        source: std::str::Utf8Error,
    },

    /// Returned when the body holds fewer values than `frames * dim`.
    #[error("short read in {path}: expected {expected} values, got {got}")]
    ShortRead {
        /// Path to the sequence file.
        path: PathBuf,
        /// Values required by the header.
        expected: usize,
        /// Values actually present.
        got: usize,
    },

    /// Returned when a value is NaN, Inf, or otherwise not a finite float.
    #[error("non-finite value in {path}: frame {frame}, dim {dim}, raw value \"{raw}\"")]
    NonFiniteValue {
        /// Path to the sequence file.
        path: PathBuf,
        /// Zero-based frame index.
        frame: usize,
        /// Zero-based feature index within the frame.
        dim: usize,
        /// The raw token that failed to parse.
        raw: String,
    },

    /// Returned when the parsed values do not form a valid feature sequence.
    #[error("invalid sequence in {path}")]
    InvalidSequence {
        /// Path to the sequence file.
        path: PathBuf,
        /// Validation error.
        source: DtwError,
    },

    /// Returned when the experiment name contains characters outside `[a-zA-Z0-9_-]`.
    #[error("invalid experiment name \"{name}\": must match [a-zA-Z0-9_-]+")]
    InvalidExperimentName {
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

    /// Returned when a result file cannot be written.
    #[error("cannot write file {path}")]
    WriteFile {
        /// Path that was attempted.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Returned when a CSV report row cannot be written.
    #[error("cannot write CSV record to {path}")]
    CsvWrite {
        /// Path to the CSV file.
        path: PathBuf,
        /// Underlying CSV error.
        source: csv::Error,
    },

    /// Returned when the JSON summary cannot be serialized.
    #[error("cannot serialize summary for {path}")]
    Serialize {
        /// Destination path.
        path: PathBuf,
        /// Underlying serializer error.
        source: serde_json::Error,
    },
}
