//! Nearest-template classification loop over a batch of inputs.

use tracing::{debug, info, instrument, warn};
use wordmatch_dtw::{CostMatrix, FeatureSequence, MatchOutcome};

use crate::config::ClassifierConfig;
use crate::error::ClassifyError;
use crate::label::WordId;
use crate::result::{BatchSummary, ClassificationResult};
use crate::source::{OutcomeReporter, SequenceSource};

/// Templates loaded once per batch, in ascending word order.
#[derive(Debug, Clone, Default)]
pub struct TemplateSet {
    templates: Vec<(WordId, FeatureSequence)>,
    skipped: Vec<WordId>,
}

impl TemplateSet {
    pub(crate) fn load<S, I>(source: &S, ids: I) -> Self
    where
        S: SequenceSource,
        I: IntoIterator<Item = WordId>,
    {
        let mut set = Self::default();
        for id in ids {
            match source.load(id) {
                Ok(sequence) => set.templates.push((id, sequence)),
                Err(err) => {
                    warn!(template = %id, error = %err, "skipping template");
                    set.skipped.push(id);
                }
            }
        }
        set.templates.sort_by_key(|(id, _)| *id);
        debug!(
            loaded = set.templates.len(),
            skipped = set.skipped.len(),
            "templates loaded"
        );
        set
    }

    /// Build a set from already-loaded templates.
    #[must_use]
    pub fn from_sequences(templates: impl IntoIterator<Item = (WordId, FeatureSequence)>) -> Self {
        let mut templates: Vec<_> = templates.into_iter().collect();
        templates.sort_by_key(|(id, _)| *id);
        Self {
            templates,
            skipped: Vec::new(),
        }
    }

    /// Return the number of loaded templates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.templates.len()
    }

    /// Return true if no template loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }

    /// Return the templates that failed to load.
    #[must_use]
    pub fn skipped(&self) -> &[WordId] {
        &self.skipped
    }

    /// Iterate over loaded templates in ascending word order.
    pub fn iter(&self) -> impl Iterator<Item = (WordId, &FeatureSequence)> {
        self.templates.iter().map(|(id, seq)| (*id, seq))
    }
}

#[instrument(
    skip(config, templates, inputs, reporter),
    fields(words = config.word_count, weight = config.matcher.weight(), templates = templates.len())
)]
pub(crate) fn classify_batch<S, R>(
    config: &ClassifierConfig,
    templates: &TemplateSet,
    inputs: &S,
    reporter: &mut R,
) -> Result<BatchSummary, ClassifyError>
where
    S: SequenceSource,
    R: OutcomeReporter,
{
    let mut workspace = CostMatrix::with_capacity(config.capacity);
    let mut summary = BatchSummary::new(config.matcher.weight());
    summary.skipped_templates = templates.skipped().to_vec();

    for id in config.ids() {
        let input = match inputs.load(id) {
            Ok(input) => input,
            Err(err) => {
                warn!(input = %id, error = %err, "skipping input");
                summary.skipped_inputs.push(id);
                continue;
            }
        };

        let result = classify_one(config, templates, &mut workspace, id, &input, &mut summary)?;
        debug!(
            input = %id,
            predicted = ?result.predicted.map(WordId::number),
            distance = result.distance.map(|d| d.value()),
            candidates = result.candidates,
            "input classified"
        );

        reporter
            .report(&result)
            .map_err(|err| ClassifyError::Report {
                input: id,
                source: Box::new(err),
            })?;
        summary.record(&result);
    }

    info!(
        total = summary.total,
        correct = summary.correct,
        accuracy = summary.accuracy(),
        global_min = summary.global_min_distance.map(|d| d.value()),
        "batch complete"
    );
    Ok(summary)
}

/// Find the nearest template for one input. Ties keep the earliest template.
fn classify_one(
    config: &ClassifierConfig,
    templates: &TemplateSet,
    workspace: &mut CostMatrix,
    id: WordId,
    input: &FeatureSequence,
    summary: &mut BatchSummary,
) -> Result<ClassificationResult, ClassifyError> {
    let mut champion: Option<(WordId, MatchOutcome)> = None;
    let mut candidates = 0usize;

    for (template_id, template) in templates.iter() {
        let outcome = match config
            .matcher
            .match_with(workspace, template.as_view(), input.as_view())
        {
            Ok(outcome) => outcome,
            Err(err) if err.is_invalid_input() => {
                debug!(input = %id, template = %template_id, error = %err, "skipping pair");
                summary.skipped_pairs += 1;
                continue;
            }
            Err(source) => {
                return Err(ClassifyError::CorruptMatch {
                    input: id,
                    template: template_id,
                    source,
                });
            }
        };
        candidates += 1;

        let better = champion
            .as_ref()
            .is_none_or(|(_, best)| outcome.distance < best.distance);
        if better {
            champion = Some((template_id, outcome));
        }
    }

    let (predicted, distance, path) = match champion {
        Some((template_id, outcome)) => (Some(template_id), Some(outcome.distance), outcome.path),
        None => (None, None, None),
    };

    Ok(ClassificationResult {
        input: id,
        predicted,
        correct: predicted == Some(id),
        distance,
        path,
        candidates,
    })
}
