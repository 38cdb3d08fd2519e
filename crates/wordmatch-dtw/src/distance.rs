//! Local Euclidean metric and the normalized match distance newtype.

use std::cmp::Ordering;
use std::fmt;

/// Euclidean distance between two feature vectors of equal dimension.
///
/// Callers guarantee equal lengths; [`DpMatcher`](crate::DpMatcher) checks
/// the dimensions of both sequences once per pair before filling the matrix.
#[must_use]
pub fn euclidean(a: &[f64], b: &[f64]) -> f64 {
    debug_assert_eq!(a.len(), b.len(), "feature vectors must share a dimension");
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum::<f64>()
        .sqrt()
}

/// A non-negative, length-normalized DP matching distance.
///
/// The accumulated cost at the end cell divided by the sum of both
/// sequence lengths, so distances of pairs with different lengths compare.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd)]
pub struct MatchDistance(f64);

impl MatchDistance {
    /// Create a new match distance from a raw value.
    pub(crate) fn new(value: f64) -> Self {
        Self(value)
    }

    /// Return the raw distance value.
    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// Total ordering comparison using [`f64::total_cmp`].
    #[must_use]
    pub fn total_cmp(&self, other: &Self) -> Ordering {
        self.0.total_cmp(&other.0)
    }
}

impl fmt::Display for MatchDistance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.6}", self.0)
    }
}
