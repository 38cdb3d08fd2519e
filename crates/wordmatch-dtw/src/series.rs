//! Feature sequence types with validation guarantees.

use crate::error::DtwError;

/// Feature dimension used by the recognition corpus (MFCC order).
pub const DEFAULT_DIM: usize = 15;

/// Maximum number of frames a single word recording may hold.
pub const DEFAULT_MAX_FRAMES: usize = 200;

/// Owned, validated sequence of fixed-dimension feature vectors.
///
/// Frames are stored row-major in one flat buffer: frame `i` occupies
/// `values[i * dim..(i + 1) * dim]`. Guaranteed non-empty, rectangular, and
/// free of NaN or infinite values.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureSequence {
    dim: usize,
    values: Vec<f64>,
}

impl FeatureSequence {
    /// Create a sequence from a row-major flat buffer of `dim`-wide frames.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::ZeroDimension`] | `dim` is zero |
    /// | [`DtwError::EmptySequence`] | `values` is empty |
    /// | [`DtwError::RaggedFrame`] | `values.len()` is not a multiple of `dim` |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_flat(dim: usize, values: Vec<f64>) -> Result<Self, DtwError> {
        if dim == 0 {
            return Err(DtwError::ZeroDimension);
        }
        if values.is_empty() {
            return Err(DtwError::EmptySequence);
        }
        let remainder = values.len() % dim;
        if remainder != 0 {
            return Err(DtwError::RaggedFrame {
                frame: values.len() / dim,
                expected: dim,
                got: remainder,
            });
        }
        if let Some(index) = values.iter().position(|v| !v.is_finite()) {
            return Err(DtwError::NonFiniteValue {
                frame: index / dim,
                dim: index % dim,
            });
        }
        Ok(Self { dim, values })
    }

    /// Create a sequence from one vector per frame.
    ///
    /// The dimension is taken from the first frame.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`DtwError::EmptySequence`] | `frames` is empty |
    /// | [`DtwError::ZeroDimension`] | The first frame is empty |
    /// | [`DtwError::RaggedFrame`] | A frame differs in length from the first |
    /// | [`DtwError::NonFiniteValue`] | Any value is NaN or infinite |
    pub fn from_frames(frames: Vec<Vec<f64>>) -> Result<Self, DtwError> {
        let dim = frames.first().ok_or(DtwError::EmptySequence)?.len();
        if dim == 0 {
            return Err(DtwError::ZeroDimension);
        }
        let mut values = Vec::with_capacity(frames.len() * dim);
        for (frame, vector) in frames.into_iter().enumerate() {
            if vector.len() != dim {
                return Err(DtwError::RaggedFrame {
                    frame,
                    expected: dim,
                    got: vector.len(),
                });
            }
            values.extend(vector);
        }
        Self::from_flat(dim, values)
    }

    /// Borrow this sequence as a zero-copy view.
    #[must_use]
    pub fn as_view(&self) -> FeatureSequenceView<'_> {
        FeatureSequenceView {
            dim: self.dim,
            values: &self.values,
        }
    }

    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Return true if the sequence has no frames.
    ///
    /// Always `false` for a constructed sequence. Provided to satisfy the
    /// `len_without_is_empty` convention.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the feature dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return frame `index` as a slice of `dim` values.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn frame(&self, index: usize) -> &[f64] {
        self.as_view().frame(index)
    }
}

/// Borrowed view into a validated [`FeatureSequence`].
#[derive(Debug, Clone, Copy)]
pub struct FeatureSequenceView<'a> {
    dim: usize,
    values: &'a [f64],
}

impl<'a> FeatureSequenceView<'a> {
    /// Return the number of frames.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len() / self.dim
    }

    /// Return true if the view has no frames. Always `false` for valid views.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Return the feature dimension.
    #[must_use]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Return frame `index` as a slice of `dim` values.
    ///
    /// # Panics
    ///
    /// Panics if `index >= self.len()`.
    #[must_use]
    pub fn frame(&self, index: usize) -> &'a [f64] {
        let start = index * self.dim;
        &self.values[start..start + self.dim]
    }

    /// Iterate over frames in order.
    pub fn frames(&self) -> impl Iterator<Item = &'a [f64]> + 'a {
        self.values.chunks_exact(self.dim)
    }
}
