//! Seams to the sequence loader and the result reporter.

use std::collections::BTreeMap;
use std::convert::Infallible;

use wordmatch_dtw::FeatureSequence;

use crate::label::WordId;
use crate::result::ClassificationResult;

/// Loads the feature sequence recorded for a word.
///
/// Implementations own identifier-to-storage mapping; the classifier only
/// ever hands over a [`WordId`]. A load error skips that word.
pub trait SequenceSource {
    /// Error returned when a word cannot be loaded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the sequence for `id`.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the word is missing or malformed.
    fn load(&self, id: WordId) -> Result<FeatureSequence, Self::Error>;
}

/// Receives each classification result as soon as it is produced.
pub trait OutcomeReporter {
    /// Error returned when a result cannot be recorded.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Record one result.
    ///
    /// # Errors
    ///
    /// Returns `Self::Error` when the result cannot be written.
    fn report(&mut self, result: &ClassificationResult) -> Result<(), Self::Error>;
}

impl OutcomeReporter for Vec<ClassificationResult> {
    type Error = Infallible;

    fn report(&mut self, result: &ClassificationResult) -> Result<(), Self::Error> {
        self.push(result.clone());
        Ok(())
    }
}

/// Error from [`MemorySource`] for a word it does not hold.
#[derive(Debug, thiserror::Error)]
#[error("no sequence stored for word {id}")]
pub struct MissingSequence {
    /// The requested word.
    pub id: WordId,
}

/// In-memory [`SequenceSource`] keyed by word.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    sequences: BTreeMap<WordId, FeatureSequence>,
}

impl MemorySource {
    /// Create an empty source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store `sequence` under `id`, replacing any previous entry.
    #[must_use]
    pub fn with(mut self, id: WordId, sequence: FeatureSequence) -> Self {
        self.sequences.insert(id, sequence);
        self
    }

    /// Store `sequence` under `id`, replacing any previous entry.
    pub fn insert(&mut self, id: WordId, sequence: FeatureSequence) {
        self.sequences.insert(id, sequence);
    }

    /// Return the number of stored words.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sequences.len()
    }

    /// Return true if no words are stored.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sequences.is_empty()
    }
}

impl SequenceSource for MemorySource {
    type Error = MissingSequence;

    fn load(&self, id: WordId) -> Result<FeatureSequence, Self::Error> {
        self.sequences.get(&id).cloned().ok_or(MissingSequence { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_source_loads_and_misses() {
        let seq = FeatureSequence::from_flat(2, vec![1.0, 2.0]).unwrap();
        let source = MemorySource::new().with(WordId::new(4), seq.clone());
        assert_eq!(source.load(WordId::new(4)).unwrap(), seq);
        let err = source.load(WordId::new(5)).unwrap_err();
        assert_eq!(err.to_string(), "no sequence stored for word 005");
    }
}
