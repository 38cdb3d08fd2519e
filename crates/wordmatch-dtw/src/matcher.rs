//! DP matching between a template and an input sequence.

use tracing::instrument;

use crate::distance::MatchDistance;
use crate::error::DtwError;
use crate::matrix::CostMatrix;
use crate::path::AlignmentPath;
use crate::series::FeatureSequenceView;

/// Result of matching one template against one input.
#[derive(Debug, Clone, PartialEq)]
pub struct MatchOutcome {
    /// Accumulated cost at the end cell divided by `A + B`.
    pub distance: MatchDistance,
    /// Optimal alignment, present when path tracking is enabled.
    pub path: Option<AlignmentPath>,
}

/// Immutable DP matching configuration. Thread-safe and copyable.
///
/// # Defaults
///
/// | Parameter     | Default |
/// |---------------|---------|
/// | `weight`      | 2.0     |
/// | `track_path`  | false   |
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DpMatcher {
    weight: f64,
    track_path: bool,
}

impl DpMatcher {
    /// Diagonal weight used by the recognition experiments.
    pub const DEFAULT_WEIGHT: f64 = 2.0;

    /// Create a matcher with the given diagonal-step weight.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::InvalidWeight`] | `weight` is negative, NaN, or infinite |
    pub fn new(weight: f64) -> Result<Self, DtwError> {
        if !weight.is_finite() || weight < 0.0 {
            return Err(DtwError::InvalidWeight { weight });
        }
        Ok(Self {
            weight,
            track_path: false,
        })
    }

    /// Enable or disable back-pointer recording and path reconstruction.
    #[must_use]
    pub fn with_path_tracking(mut self, track_path: bool) -> Self {
        self.track_path = track_path;
        self
    }

    /// Return the diagonal-step weight.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.weight
    }

    /// Return true if matches reconstruct the alignment path.
    #[must_use]
    pub fn tracks_path(&self) -> bool {
        self.track_path
    }

    /// Match `template` against `input` using a matrix allocated for this pair.
    ///
    /// Use [`match_with`][Self::match_with] to reuse one matrix across many
    /// pairs.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | Feature dimensions differ |
    /// | [`DtwError::CorruptState`] | Traceback hit a broken back-pointer |
    pub fn match_pair(
        &self,
        template: FeatureSequenceView<'_>,
        input: FeatureSequenceView<'_>,
    ) -> Result<MatchOutcome, DtwError> {
        let mut matrix = CostMatrix::exact(template.len(), input.len());
        self.match_with(&mut matrix, template, input)
    }

    /// Match `template` against `input`, filling the caller's `matrix`.
    ///
    /// The matrix is overwritten over the `A x B` region this match reads,
    /// so the same workspace can be passed to any number of sequential calls.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | Feature dimensions differ |
    /// | [`DtwError::CapacityExceeded`] | A sequence is longer than the matrix capacity |
    /// | [`DtwError::CorruptState`] | Traceback hit a broken back-pointer |
    #[instrument(level = "trace", skip(matrix, template, input), fields(rows = template.len(), cols = input.len()))]
    pub fn match_with(
        &self,
        matrix: &mut CostMatrix,
        template: FeatureSequenceView<'_>,
        input: FeatureSequenceView<'_>,
    ) -> Result<MatchOutcome, DtwError> {
        matrix.fill(template, input, self.weight, self.track_path)?;

        let (rows, cols) = matrix.shape();
        let distance = MatchDistance::new(matrix.final_cost() / (rows + cols) as f64);
        let path = if self.track_path {
            Some(AlignmentPath::trace(matrix)?)
        } else {
            None
        };

        Ok(MatchOutcome { distance, path })
    }

    /// Return only the normalized distance between `template` and `input`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | Feature dimensions differ |
    pub fn distance(
        &self,
        template: FeatureSequenceView<'_>,
        input: FeatureSequenceView<'_>,
    ) -> Result<MatchDistance, DtwError> {
        let mut matrix = CostMatrix::exact(template.len(), input.len());
        matrix.fill(template, input, self.weight, false)?;
        let (rows, cols) = matrix.shape();
        Ok(MatchDistance::new(matrix.final_cost() / (rows + cols) as f64))
    }
}

impl Default for DpMatcher {
    fn default() -> Self {
        Self {
            weight: Self::DEFAULT_WEIGHT,
            track_path: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path::AlignmentStep;
    use crate::series::FeatureSequence;

    fn seq(frames: &[&[f64]]) -> FeatureSequence {
        FeatureSequence::from_frames(frames.iter().map(|f| f.to_vec()).collect()).unwrap()
    }

    fn cells(path: &AlignmentPath) -> Vec<(usize, usize)> {
        path.steps().iter().map(|s| (s.template, s.input)).collect()
    }

    #[test]
    fn identical_two_dimensional_pair() {
        let a = seq(&[&[0.0, 0.0], &[1.0, 1.0]]);
        let b = seq(&[&[0.0, 0.0], &[1.0, 1.0]]);
        let matcher = DpMatcher::new(2.0).unwrap().with_path_tracking(true);
        let outcome = matcher.match_pair(a.as_view(), b.as_view()).unwrap();
        assert_eq!(outcome.distance.value(), 0.0);
        assert_eq!(cells(outcome.path.as_ref().unwrap()), vec![(0, 0), (1, 1)]);
    }

    #[test]
    fn hand_computed_normalized_distance() {
        // cost(1,2) = 5, normalized by 2 + 3 frames
        let a = seq(&[&[0.0], &[5.0]]);
        let b = seq(&[&[0.0], &[5.0], &[10.0]]);
        let matcher = DpMatcher::default().with_path_tracking(true);
        let outcome = matcher.match_pair(a.as_view(), b.as_view()).unwrap();
        assert!((outcome.distance.value() - 1.0).abs() < 1e-12);
        assert_eq!(cells(outcome.path.as_ref().unwrap()), vec![(0, 0), (1, 1), (1, 2)]);
    }

    #[test]
    fn self_match_follows_diagonal() {
        let a = seq(&[&[1.0, 2.0], &[3.0, 1.0], &[0.5, 0.5], &[4.0, 4.0], &[2.0, 0.0]]);
        for weight in [0.5, 1.0, 2.0] {
            let matcher = DpMatcher::new(weight).unwrap().with_path_tracking(true);
            let outcome = matcher.match_pair(a.as_view(), a.as_view()).unwrap();
            assert_eq!(outcome.distance.value(), 0.0);
            let expected: Vec<AlignmentStep> = (0..a.len())
                .map(|k| AlignmentStep { template: k, input: k })
                .collect();
            assert_eq!(outcome.path.unwrap().steps(), expected.as_slice());
        }
    }

    #[test]
    fn single_frame_pair() {
        let a = seq(&[&[0.0, 0.0]]);
        let b = seq(&[&[3.0, 4.0]]);
        let d = DpMatcher::default().distance(a.as_view(), b.as_view()).unwrap();
        assert!((d.value() - 2.5).abs() < 1e-12);
    }

    #[test]
    fn path_is_skipped_unless_requested() {
        let a = seq(&[&[0.0], &[1.0]]);
        let outcome = DpMatcher::default().match_pair(a.as_view(), a.as_view()).unwrap();
        assert!(outcome.path.is_none());
    }

    #[test]
    fn distance_matches_match_pair() {
        let a = seq(&[&[1.0, 0.0], &[3.0, 2.0], &[5.0, 1.0], &[2.0, 2.0]]);
        let b = seq(&[&[2.0, 1.0], &[4.0, 0.0], &[1.0, 3.0]]);
        let matcher = DpMatcher::new(1.0).unwrap().with_path_tracking(true);
        let full = matcher.match_pair(a.as_view(), b.as_view()).unwrap();
        let only = matcher.distance(a.as_view(), b.as_view()).unwrap();
        assert_eq!(full.distance, only);
    }

    #[test]
    fn shared_workspace_matches_private_matrix() {
        let pairs = [
            (seq(&[&[0.0], &[2.0], &[4.0], &[6.0]]), seq(&[&[1.0], &[5.0]])),
            (seq(&[&[3.0]]), seq(&[&[0.0], &[1.0], &[2.0]])),
            (seq(&[&[1.0], &[1.0], &[9.0]]), seq(&[&[1.0], &[9.0], &[9.0], &[9.0]])),
        ];
        let matcher = DpMatcher::default().with_path_tracking(true);
        let mut workspace = CostMatrix::with_capacity(8);
        for (a, b) in &pairs {
            let shared = matcher.match_with(&mut workspace, a.as_view(), b.as_view()).unwrap();
            let private = matcher.match_pair(a.as_view(), b.as_view()).unwrap();
            assert_eq!(shared, private);
        }
    }

    #[test]
    fn heavier_diagonal_never_lowers_distance() {
        let a = seq(&[&[0.0], &[1.0], &[3.0], &[2.0]]);
        let b = seq(&[&[1.0], &[2.0], &[2.0]]);
        let mut last = 0.0;
        for weight in [0.0, 0.5, 1.0, 2.0, 4.0] {
            let d = DpMatcher::new(weight)
                .unwrap()
                .distance(a.as_view(), b.as_view())
                .unwrap()
                .value();
            assert!(d >= last - 1e-12, "weight {weight}: {d} < {last}");
            last = d;
        }
    }

    #[test]
    fn rejects_invalid_weights() {
        for weight in [-0.5, f64::NAN, f64::INFINITY] {
            assert!(matches!(
                DpMatcher::new(weight),
                Err(DtwError::InvalidWeight { .. })
            ));
        }
        assert!(DpMatcher::new(0.0).is_ok());
    }

    #[test]
    fn rejects_dimension_mismatch() {
        let a = seq(&[&[0.0, 1.0]]);
        let b = seq(&[&[0.0]]);
        let err = DpMatcher::default().match_pair(a.as_view(), b.as_view()).unwrap_err();
        assert!(err.is_invalid_input());
    }

    #[test]
    fn rejects_input_over_workspace_capacity() {
        let a = seq(&[&[0.0]]);
        let b = seq(&[&[0.0], &[1.0], &[2.0]]);
        let mut workspace = CostMatrix::with_capacity(2);
        let err = DpMatcher::default()
            .match_with(&mut workspace, a.as_view(), b.as_view())
            .unwrap_err();
        assert!(matches!(err, DtwError::CapacityExceeded { frames: 3, capacity: 2 }));
    }

    #[test]
    fn default_weight_is_two() {
        assert_eq!(DpMatcher::default().weight(), 2.0);
        assert!(!DpMatcher::default().tracks_path());
    }
}
