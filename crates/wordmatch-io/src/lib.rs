//! File I/O, validation, and report serialization for the wordmatch pipeline.

mod domain;
mod error;
mod reader;
mod writer;

pub use domain::{ExperimentName, SetLayout};
pub use error::IoError;
pub use reader::{SequenceDirectory, SequenceReader};
pub use writer::{RecognitionReport, ResultWriter, SummaryReport, weight_label};
