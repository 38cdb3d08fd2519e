//! Alignment path types and back-pointer traceback.

use crate::error::DtwError;
use crate::matrix::CostMatrix;

/// A single cell on an alignment path, pairing a template frame with an
/// input frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlignmentStep {
    /// Frame index in the template sequence.
    pub template: usize,
    /// Frame index in the input sequence.
    pub input: usize,
}

/// An ordered sequence of cells from `(0, 0)` to `(A-1, B-1)`.
///
/// Both coordinates are non-decreasing and each step advances one or both
/// of them by exactly one.
#[derive(Debug, Clone, PartialEq)]
pub struct AlignmentPath(Vec<AlignmentStep>);

impl AlignmentPath {
    /// Walk back-pointers from the end cell of `matrix` to the origin.
    ///
    /// Every followed link must lower `template + input` by at least one,
    /// which bounds the walk at `A + B - 1` cells.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::CorruptState`] if the matrix holds no back-pointers,
    /// a link is missing or leaves the grid, or the walk exceeds its bound.
    pub(crate) fn trace(matrix: &CostMatrix) -> Result<Self, DtwError> {
        let (rows, cols) = matrix.shape();
        if rows == 0 || cols == 0 || !matrix.has_back_pointers() {
            return Err(DtwError::CorruptState {
                row: rows.saturating_sub(1),
                col: cols.saturating_sub(1),
                reason: "back-pointers were not recorded",
            });
        }

        let bound = rows + cols - 1;
        let mut steps = Vec::with_capacity(bound);
        let (mut i, mut j) = (rows - 1, cols - 1);

        loop {
            if steps.len() == bound {
                return Err(DtwError::CorruptState {
                    row: i,
                    col: j,
                    reason: "path longer than rows + cols - 1",
                });
            }
            steps.push(AlignmentStep { template: i, input: j });
            match matrix.back_pointer(i, j).predecessor(i, j)? {
                None => break,
                Some((pi, pj)) => {
                    debug_assert!(pi + pj < i + j);
                    i = pi;
                    j = pj;
                }
            }
        }

        steps.reverse();
        Ok(Self(steps))
    }

    /// Return the steps as a slice.
    #[must_use]
    pub fn steps(&self) -> &[AlignmentStep] {
        &self.0
    }

    /// Return the number of cells on the path.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Return true if the path contains no steps.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a AlignmentPath {
    type Item = &'a AlignmentStep;
    type IntoIter = std::slice::Iter<'a, AlignmentStep>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
