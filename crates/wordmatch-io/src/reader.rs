//! Feature sequence file reader with full input validation.

use std::path::Path;

use tracing::{debug, instrument};
use wordmatch_classify::{SequenceSource, WordId};
use wordmatch_dtw::{DEFAULT_DIM, DEFAULT_MAX_FRAMES, FeatureSequence};

use crate::domain::SetLayout;
use crate::IoError;

/// Reads one word recording from a text file.
///
/// Expected format:
/// - two free-form header lines (ignored, any encoding)
/// - a line starting with the decimal frame count
/// - `frames * dim` whitespace-separated floats, row-major
///
/// Values past `frames * dim` are ignored.
///
/// # Errors
///
/// | Variant | Condition |
/// |---|---|
/// | [`IoError::FileNotFound`] | File doesn't exist or is unreadable |
/// | [`IoError::MissingHeader`] | File ends before the frame-count line |
/// | [`IoError::InvalidFrameCount`] | Frame-count line does not start with an integer |
/// | [`IoError::ZeroFrames`] | Declared frame count is zero |
/// | [`IoError::TooManyFrames`] | Declared frame count exceeds the capacity |
/// | [`IoError::InvalidEncoding`] | Body after the frame-count line is not UTF-8 |
/// | [`IoError::ShortRead`] | Fewer than `frames * dim` values |
/// | [`IoError::NonFiniteValue`] | Value is NaN, Inf, or unparseable |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SequenceReader {
    dim: usize,
    capacity: usize,
}

impl SequenceReader {
    /// Create a reader for `dim`-wide frames with the default capacity.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            capacity: DEFAULT_MAX_FRAMES,
        }
    }

    /// Set the largest frame count a file may declare.
    #[must_use]
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.capacity = capacity;
        self
    }

    /// Return the frame dimension.
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return the frame capacity.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Read and validate the file at `path`.
    #[instrument(level = "debug", skip(self), fields(path = %path.display()))]
    pub fn read(&self, path: &Path) -> Result<FeatureSequence, IoError> {
        let bytes = std::fs::read(path).map_err(|e| IoError::FileNotFound {
            path: path.to_path_buf(),
            source: e,
        })?;
        self.parse(path, &bytes)
    }

    fn parse(&self, path: &Path, bytes: &[u8]) -> Result<FeatureSequence, IoError> {
        // Header lines are opaque bytes in any encoding.
        let mut rest = bytes;
        for line in 1..=2 {
            let (_, tail) = split_line(rest).ok_or_else(|| IoError::MissingHeader {
                path: path.to_path_buf(),
                line,
            })?;
            rest = tail;
        }
        let (count_line, body) = split_line(rest).ok_or_else(|| IoError::MissingHeader {
            path: path.to_path_buf(),
            line: 3,
        })?;
        let frames = parse_frame_count(count_line).ok_or_else(|| IoError::InvalidFrameCount {
            path: path.to_path_buf(),
            raw: String::from_utf8_lossy(count_line).trim_end().to_string(),
        })?;
        if frames == 0 {
            return Err(IoError::ZeroFrames {
                path: path.to_path_buf(),
            });
        }
        if frames > self.capacity {
            return Err(IoError::TooManyFrames {
                path: path.to_path_buf(),
                frames,
                capacity: self.capacity,
            });
        }

        let body = std::str::from_utf8(body).map_err(|e| IoError::InvalidEncoding {
            path: path.to_path_buf(),
            source: e,
        })?;
        let expected = frames * self.dim;
        let mut values = Vec::with_capacity(expected);
        let mut tokens = body.split_whitespace();
        for (k, raw) in tokens.by_ref().take(expected).enumerate() {
            let value = raw
                .parse::<f64>()
                .ok()
                .filter(|v| v.is_finite())
                .ok_or_else(|| IoError::NonFiniteValue {
                    path: path.to_path_buf(),
                    frame: k / self.dim,
                    dim: k % self.dim,
                    raw: raw.to_string(),
                })?;
            values.push(value);
        }
        if values.len() < expected {
            return Err(IoError::ShortRead {
                path: path.to_path_buf(),
                expected,
                got: values.len(),
            });
        }

        let trailing = tokens.count();
        if trailing > 0 {
            debug!(trailing, "ignoring trailing values");
        }

        FeatureSequence::from_flat(self.dim, values).map_err(|e| IoError::InvalidSequence {
            path: path.to_path_buf(),
            source: e,
        })
    }
}

impl Default for SequenceReader {
    fn default() -> Self {
        Self::new(DEFAULT_DIM)
    }
}

/// Split off the first line, keeping its `\n`. The last line may lack one.
fn split_line(bytes: &[u8]) -> Option<(&[u8], &[u8])> {
    if bytes.is_empty() {
        return None;
    }
    let end = bytes
        .iter()
        .position(|&b| b == b'\n')
        .map_or(bytes.len(), |i| i + 1);
    Some(bytes.split_at(end))
}

/// Leading unsigned integer of the frame-count line.
fn parse_frame_count(line: &[u8]) -> Option<usize> {
    let start = line
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(line.len());
    let digits = &line[start..];
    let len = digits
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(digits.len());
    std::str::from_utf8(&digits[..len]).ok()?.parse().ok()
}

/// A [`SequenceSource`] backed by one set directory on disk.
#[derive(Debug, Clone)]
pub struct SequenceDirectory {
    layout: SetLayout,
    reader: SequenceReader,
}

impl SequenceDirectory {
    /// Load words laid out by `layout` with `reader`.
    pub fn new(layout: SetLayout, reader: SequenceReader) -> Self {
        Self { layout, reader }
    }

    /// Return the on-disk layout.
    pub fn layout(&self) -> &SetLayout {
        &self.layout
    }
}

impl SequenceSource for SequenceDirectory {
    type Error = IoError;

    fn load(&self, id: WordId) -> Result<FeatureSequence, IoError> {
        self.reader.read(&self.layout.path_for(id))
    }
}
