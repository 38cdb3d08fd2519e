//! Per-input classification results and batch-level accuracy summary.

use wordmatch_dtw::{AlignmentPath, MatchDistance};

use crate::label::WordId;

/// Outcome of classifying one input word against the template set.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassificationResult {
    /// The input word being classified.
    pub input: WordId,
    /// Nearest template, or `None` when no template could be compared.
    pub predicted: Option<WordId>,
    /// Whether `predicted` equals `input`.
    pub correct: bool,
    /// Normalized distance to the nearest template.
    pub distance: Option<MatchDistance>,
    /// Alignment path to the nearest template, when path tracking is enabled.
    pub path: Option<AlignmentPath>,
    /// Number of templates actually compared against this input.
    pub candidates: usize,
}

impl ClassificationResult {
    /// Return the length of the best alignment path, or 0 without a path.
    #[must_use]
    pub fn path_len(&self) -> usize {
        self.path.as_ref().map_or(0, AlignmentPath::len)
    }
}

/// Aggregate statistics over one batch run.
#[derive(Debug, Clone, PartialEq)]
pub struct BatchSummary {
    /// Diagonal weight used for every match in the batch.
    pub weight: f64,
    /// Inputs classified (including zero-candidate inputs).
    pub total: usize,
    /// Inputs whose prediction equals their own identifier.
    pub correct: usize,
    /// Smallest nearest-template distance seen over all inputs.
    pub global_min_distance: Option<MatchDistance>,
    /// Inputs that failed to load and were not classified.
    pub skipped_inputs: Vec<WordId>,
    /// Templates that failed to load and were never compared.
    pub skipped_templates: Vec<WordId>,
    /// Pairs rejected as invalid input (e.g. dimension mismatch).
    pub skipped_pairs: usize,
    /// `(input, predicted)` for every incorrect classification.
    pub misrecognized: Vec<(WordId, Option<WordId>)>,
}

impl BatchSummary {
    pub(crate) fn new(weight: f64) -> Self {
        Self {
            weight,
            total: 0,
            correct: 0,
            global_min_distance: None,
            skipped_inputs: Vec::new(),
            skipped_templates: Vec::new(),
            skipped_pairs: 0,
            misrecognized: Vec::new(),
        }
    }

    /// Fold one result into the running counters.
    pub(crate) fn record(&mut self, result: &ClassificationResult) {
        self.total += 1;
        if result.correct {
            self.correct += 1;
        } else {
            self.misrecognized.push((result.input, result.predicted));
        }
        if let Some(d) = result.distance
            && self.global_min_distance.is_none_or(|best| d < best)
        {
            self.global_min_distance = Some(d);
        }
    }

    /// Recognition rate in percent, or `None` when no input was classified.
    #[must_use]
    pub fn accuracy(&self) -> Option<f64> {
        if self.total == 0 {
            None
        } else {
            Some(100.0 * self.correct as f64 / self.total as f64)
        }
    }
}
