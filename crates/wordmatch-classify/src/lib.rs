//! Nearest-template word classification over a numbered vocabulary.
//!
//! Every input word is matched against every loaded template with
//! [`wordmatch_dtw::DpMatcher`] and labeled with the template at minimum
//! normalized distance. Results stream to an [`OutcomeReporter`] and fold
//! into a [`BatchSummary`] with the recognition rate.

mod classifier;
mod config;
mod error;
mod label;
mod result;
mod source;

pub use classifier::TemplateSet;
pub use config::ClassifierConfig;
pub use error::ClassifyError;
pub use label::WordId;
pub use result::{BatchSummary, ClassificationResult};
pub use source::{MemorySource, MissingSequence, OutcomeReporter, SequenceSource};
