//! Configuration builder for nearest-template batch classification.

use wordmatch_dtw::{DEFAULT_MAX_FRAMES, DpMatcher};

use crate::classifier::TemplateSet;
use crate::error::ClassifyError;
use crate::label::WordId;
use crate::result::BatchSummary;
use crate::source::{OutcomeReporter, SequenceSource};

/// Configuration for a batch classification run.
///
/// Construct via [`ClassifierConfig::new`], then chain `with_*` methods to
/// override defaults.
///
/// # Defaults
///
/// | Parameter  | Default                         |
/// |------------|---------------------------------|
/// | `matcher`  | [`DpMatcher::default`] (w = 2.0) |
/// | `capacity` | 200 frames                      |
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub(crate) word_count: u32,
    pub(crate) matcher: DpMatcher,
    pub(crate) capacity: usize,
}

impl ClassifierConfig {
    /// Default vocabulary size of the recognition corpus.
    pub const DEFAULT_WORD_COUNT: u32 = 100;

    /// Largest workspace capacity in frames (about 150 MB of cells).
    pub const MAX_CAPACITY: usize = 4096;

    /// Create a configuration classifying words `1..=word_count`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClassifyError::InvalidWordCount`] | `word_count` is zero |
    pub fn new(word_count: u32) -> Result<Self, ClassifyError> {
        if word_count == 0 {
            return Err(ClassifyError::InvalidWordCount { word_count });
        }
        Ok(Self {
            word_count,
            matcher: DpMatcher::default(),
            capacity: DEFAULT_MAX_FRAMES,
        })
    }

    /// Set the matcher (diagonal weight and path tracking) used for every pair.
    #[must_use]
    pub fn with_matcher(mut self, matcher: DpMatcher) -> Self {
        self.matcher = matcher;
        self
    }

    /// Set the frame capacity of the shared cost-matrix workspace. Pairs with
    /// a longer sequence are skipped as invalid input.
    ///
    /// The workspace holds `capacity²` cells, so the capacity must lie in
    /// `1..=MAX_CAPACITY`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClassifyError::InvalidCapacity`] | `capacity` is zero or above [`Self::MAX_CAPACITY`] |
    pub fn with_capacity(mut self, capacity: usize) -> Result<Self, ClassifyError> {
        if capacity == 0 || capacity > Self::MAX_CAPACITY {
            return Err(ClassifyError::InvalidCapacity {
                capacity,
                max: Self::MAX_CAPACITY,
            });
        }
        self.capacity = capacity;
        Ok(self)
    }

    /// Return the vocabulary size.
    #[must_use]
    pub fn word_count(&self) -> u32 {
        self.word_count
    }

    /// Return the matcher.
    #[must_use]
    pub fn matcher(&self) -> DpMatcher {
        self.matcher
    }

    /// Return the workspace capacity in frames.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Iterate over the word identifiers `1..=word_count` in order.
    pub fn ids(&self) -> impl Iterator<Item = WordId> + use<> {
        (1..=self.word_count).map(WordId::new)
    }

    /// Load every template `1..=word_count` from `source` once.
    ///
    /// Templates that fail to load are logged and recorded as skipped.
    pub fn load_templates<S: SequenceSource>(&self, source: &S) -> TemplateSet {
        TemplateSet::load(source, self.ids())
    }

    /// Classify every input `1..=word_count` against `templates`, streaming
    /// each result to `reporter`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`ClassifyError::CorruptMatch`] | Traceback hit a broken back-pointer |
    /// | [`ClassifyError::Report`] | `reporter` rejected a result |
    pub fn classify<S, R>(
        &self,
        templates: &TemplateSet,
        inputs: &S,
        reporter: &mut R,
    ) -> Result<BatchSummary, ClassifyError>
    where
        S: SequenceSource,
        R: OutcomeReporter,
    {
        crate::classifier::classify_batch(self, templates, inputs, reporter)
    }
}
