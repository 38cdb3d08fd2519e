//! DP matching (dynamic time warping) over fixed-dimension feature sequences.
//!
//! Pure math library with zero I/O. Provides validated feature sequences,
//! the Euclidean local metric, the weighted cumulative-cost recurrence with
//! optional back-pointers, alignment path reconstruction, and a reusable
//! cost-matrix workspace for matching many pairs in sequence.

mod distance;
mod error;
mod matcher;
mod matrix;
mod path;
mod series;

pub use distance::{MatchDistance, euclidean};
pub use error::DtwError;
pub use matcher::{DpMatcher, MatchOutcome};
pub use matrix::{BackPointer, CostMatrix};
pub use path::{AlignmentPath, AlignmentStep};
pub use series::{DEFAULT_DIM, DEFAULT_MAX_FRAMES, FeatureSequence, FeatureSequenceView};
