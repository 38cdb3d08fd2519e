//! Cumulative-cost matrix with optional back-pointers, reusable across matches.

use crate::distance::euclidean;
use crate::error::DtwError;
use crate::series::{DEFAULT_MAX_FRAMES, FeatureSequenceView};

/// Which neighbour a cell's cumulative cost was taken from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum BackPointer {
    /// Not written by the last fill.
    #[default]
    Missing,
    /// Cell `(0, 0)`; the walk ends here.
    Origin,
    /// From `(i - 1, j)`.
    Vertical,
    /// From `(i, j - 1)`.
    Horizontal,
    /// From `(i - 1, j - 1)`.
    Diagonal,
}

impl BackPointer {
    /// Return the predecessor of cell `(row, col)`, or `None` for the origin.
    ///
    /// # Errors
    ///
    /// Returns [`DtwError::CorruptState`] when the pointer is missing, points
    /// off the grid, or marks a cell other than `(0, 0)` as the origin.
    pub(crate) fn predecessor(
        self,
        row: usize,
        col: usize,
    ) -> Result<Option<(usize, usize)>, DtwError> {
        let corrupt = |reason| DtwError::CorruptState { row, col, reason };
        match self {
            Self::Origin if row == 0 && col == 0 => Ok(None),
            Self::Origin => Err(corrupt("origin pointer away from (0, 0)")),
            Self::Missing => Err(corrupt("missing back-pointer")),
            Self::Vertical if row > 0 => Ok(Some((row - 1, col))),
            Self::Horizontal if col > 0 => Ok(Some((row, col - 1))),
            Self::Diagonal if row > 0 && col > 0 => Ok(Some((row - 1, col - 1))),
            _ => Err(corrupt("back-pointer leaves the matrix")),
        }
    }
}

/// Preallocated cost and back-pointer buffers for DP matching.
///
/// Rows index template frames and columns index input frames. Storage is
/// sized once for `capacity x capacity` cells with a fixed row stride, and
/// every fill overwrites the `rows x cols` sub-region it later reads, so a
/// single matrix can serve any number of sequential matches. Matching takes
/// it by `&mut`, which keeps concurrent matches from sharing one buffer.
#[derive(Debug, Clone)]
pub struct CostMatrix {
    max_rows: usize,
    stride: usize,
    rows: usize,
    cols: usize,
    tracked: bool,
    cost: Vec<f64>,
    back: Vec<BackPointer>,
}

impl CostMatrix {
    /// Allocate a matrix able to align sequences of up to `capacity` frames.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::allocate(capacity, capacity)
    }

    /// Allocate a matrix exactly fitting one `rows x cols` pair.
    pub(crate) fn exact(rows: usize, cols: usize) -> Self {
        Self::allocate(rows, cols)
    }

    fn allocate(max_rows: usize, stride: usize) -> Self {
        let cells = max_rows * stride;
        Self {
            max_rows,
            stride,
            rows: 0,
            cols: 0,
            tracked: false,
            cost: vec![0.0; cells],
            back: vec![BackPointer::Missing; cells],
        }
    }

    /// Return the maximum frame count accepted along either axis.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.max_rows.min(self.stride)
    }

    /// Return `(rows, cols)` of the most recent fill; `(0, 0)` before any fill.
    #[must_use]
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Return the cumulative cost at `(row, col)` from the most recent fill.
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside [`shape`](Self::shape).
    #[must_use]
    pub fn cost(&self, row: usize, col: usize) -> f64 {
        self.cost[self.index(row, col)]
    }

    /// Return the back-pointer at `(row, col)` from the most recent fill.
    ///
    /// Cells of a fill run without path tracking report [`BackPointer::Missing`]
    /// or stale values; check [`has_back_pointers`](Self::has_back_pointers).
    ///
    /// # Panics
    ///
    /// Panics if the cell lies outside [`shape`](Self::shape).
    #[must_use]
    pub fn back_pointer(&self, row: usize, col: usize) -> BackPointer {
        self.back[self.index(row, col)]
    }

    /// Return true if the most recent fill recorded back-pointers.
    #[must_use]
    pub fn has_back_pointers(&self) -> bool {
        self.tracked
    }

    /// Return the accumulated cost of the end cell `(rows - 1, cols - 1)`.
    ///
    /// # Panics
    ///
    /// Panics if the matrix has not been filled.
    #[must_use]
    pub fn final_cost(&self) -> f64 {
        self.cost(self.rows - 1, self.cols - 1)
    }

    fn index(&self, row: usize, col: usize) -> usize {
        assert!(
            row < self.rows && col < self.cols,
            "cell ({row}, {col}) out of bounds for filled shape ({}, {})",
            self.rows,
            self.cols
        );
        row * self.stride + col
    }

    #[cfg(test)]
    pub(crate) fn set_back_pointer(&mut self, row: usize, col: usize, pointer: BackPointer) {
        let idx = self.index(row, col);
        self.back[idx] = pointer;
    }

    /// Fill the cumulative-cost matrix for `template` (rows) against `input` (cols).
    ///
    /// The origin holds the local distance, the first column and row
    /// accumulate along their axis, and every other cell takes the cheapest of
    /// `above + d`, `left + d`, `diagonal + weight * d`. Candidates are tried
    /// in that order and only a strictly smaller value replaces the current
    /// best, so ties resolve vertical first, then horizontal, then diagonal.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::DimensionMismatch`] | The sequences differ in feature dimension |
    /// | [`DtwError::CapacityExceeded`] | Either sequence is longer than the matrix allows |
    pub(crate) fn fill(
        &mut self,
        template: FeatureSequenceView<'_>,
        input: FeatureSequenceView<'_>,
        weight: f64,
        track_path: bool,
    ) -> Result<(), DtwError> {
        if template.dim() != input.dim() {
            return Err(DtwError::DimensionMismatch {
                template: template.dim(),
                input: input.dim(),
            });
        }
        let rows = template.len();
        let cols = input.len();
        for (frames, capacity) in [(rows, self.max_rows), (cols, self.stride)] {
            if frames > capacity {
                return Err(DtwError::CapacityExceeded { frames, capacity });
            }
        }
        debug_assert!(rows > 0 && cols > 0, "validated sequences are non-empty");

        self.rows = rows;
        self.cols = cols;
        self.tracked = track_path;
        let stride = self.stride;

        self.cost[0] = euclidean(template.frame(0), input.frame(0));
        if track_path {
            self.back[0] = BackPointer::Origin;
        }

        for i in 1..rows {
            let idx = i * stride;
            self.cost[idx] = self.cost[idx - stride] + euclidean(template.frame(i), input.frame(0));
            if track_path {
                self.back[idx] = BackPointer::Vertical;
            }
        }

        let first = template.frame(0);
        for j in 1..cols {
            self.cost[j] = self.cost[j - 1] + euclidean(first, input.frame(j));
            if track_path {
                self.back[j] = BackPointer::Horizontal;
            }
        }

        for i in 1..rows {
            let t = template.frame(i);
            for j in 1..cols {
                let idx = i * stride + j;
                let d = euclidean(t, input.frame(j));

                let mut best = self.cost[idx - stride] + d;
                let mut pointer = BackPointer::Vertical;

                let horizontal = self.cost[idx - 1] + d;
                if horizontal < best {
                    best = horizontal;
                    pointer = BackPointer::Horizontal;
                }

                let diagonal = self.cost[idx - stride - 1] + weight * d;
                if diagonal < best {
                    best = diagonal;
                    pointer = BackPointer::Diagonal;
                }

                self.cost[idx] = best;
                if track_path {
                    self.back[idx] = pointer;
                }
            }
        }

        Ok(())
    }
}

impl Default for CostMatrix {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_FRAMES)
    }
}
