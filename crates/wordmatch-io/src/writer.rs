//! CSV recognition reports and JSON batch summaries.

use std::fs::{self, File};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, instrument};
use wordmatch_classify::{BatchSummary, ClassificationResult, OutcomeReporter};
use wordmatch_dtw::AlignmentPath;

use crate::domain::ExperimentName;
use crate::IoError;

/// Writes recognition results under one output directory.
///
/// Creates the output directory on construction if it does not exist.
/// Output files are named:
///
/// | File | Content |
/// |---|---|
/// | `{experiment}_recognition.csv` | one row per input (single weight) |
/// | `{experiment}_weight_{label}.csv` | one row per input (weight sweep) |
/// | `{experiment}_paths/path_word{NNN}.csv` | best alignment path per input |
/// | `{experiment}_summary.json` | accuracy summary per weight |
pub struct ResultWriter {
    output_dir: PathBuf,
    experiment: ExperimentName,
}

impl ResultWriter {
    /// Create a new writer targeting the given directory and experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::OutputDirCreate`] if the directory cannot be created.
    #[instrument(skip_all, fields(dir = %output_dir.display(), experiment = %experiment))]
    pub fn new(output_dir: &Path, experiment: ExperimentName) -> Result<Self, IoError> {
        fs::create_dir_all(output_dir).map_err(|e| IoError::OutputDirCreate {
            path: output_dir.to_path_buf(),
            source: e,
        })?;
        debug!("output directory ready");
        Ok(Self {
            output_dir: output_dir.to_path_buf(),
            experiment,
        })
    }

    /// Return the experiment name.
    pub fn experiment(&self) -> &ExperimentName {
        &self.experiment
    }

    /// Open `{experiment}_recognition.csv`, optionally exporting every best
    /// path to `{experiment}_paths/`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::OutputDirCreate`] | The path directory cannot be created |
    /// | [`IoError::WriteFile`] | The CSV file cannot be created |
    /// | [`IoError::CsvWrite`] | The header row cannot be written |
    pub fn recognition_report(&self, export_paths: bool) -> Result<RecognitionReport, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_recognition.csv", self.experiment.as_str()));
        let path_dir = if export_paths {
            let dir = self
                .output_dir
                .join(format!("{}_paths", self.experiment.as_str()));
            fs::create_dir_all(&dir).map_err(|e| IoError::OutputDirCreate {
                path: dir.clone(),
                source: e,
            })?;
            Some(dir)
        } else {
            None
        };
        RecognitionReport::create(path, export_paths, path_dir)
    }

    /// Open `{experiment}_weight_{label}.csv` for one run of a weight sweep,
    /// where `label` is [`weight_label`] of `weight`.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::WriteFile`] | The CSV file cannot be created |
    /// | [`IoError::CsvWrite`] | The header row cannot be written |
    pub fn sweep_report(&self, weight: f64) -> Result<RecognitionReport, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_weight_{}.csv", self.experiment.as_str(), weight_label(weight)));
        RecognitionReport::create(path, false, None)
    }

    /// Write `summary` to `{experiment}_summary.json` and return its path.
    ///
    /// # Errors
    ///
    /// | Variant | Condition |
    /// |---|---|
    /// | [`IoError::Serialize`] | The summary cannot be serialized |
    /// | [`IoError::WriteFile`] | The file cannot be written |
    #[instrument(skip_all)]
    pub fn write_summary(&self, summary: &SummaryReport) -> Result<PathBuf, IoError> {
        let path = self
            .output_dir
            .join(format!("{}_summary.json", self.experiment.as_str()));
        let json = summary.to_json().map_err(|e| IoError::Serialize {
            path: path.clone(),
            source: e,
        })?;
        fs::write(&path, &json).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        info!(path = %path.display(), "summary written");
        Ok(path)
    }
}

/// File-name label of a sweep weight.
///
/// One decimal when that is exact (`0.5`, `2.0`), otherwise the shortest
/// form that reads back as the same `f64` (`0.25`), so nearby weights do
/// not share a file.
pub fn weight_label(weight: f64) -> String {
    if (weight * 10.0).fract() == 0.0 {
        format!("{weight:.1}")
    } else {
        format!("{weight}")
    }
}

/// Streaming recognition CSV: `word,predicted,correct,distance[,path_len]`.
///
/// Words are zero-padded to three digits; an input with no comparable
/// template has empty `predicted` and `distance` cells.
pub struct RecognitionReport {
    path: PathBuf,
    csv: csv::Writer<File>,
    with_path_len: bool,
    path_dir: Option<PathBuf>,
    rows: usize,
}

impl RecognitionReport {
    fn create(
        path: PathBuf,
        with_path_len: bool,
        path_dir: Option<PathBuf>,
    ) -> Result<Self, IoError> {
        let file = File::create(&path).map_err(|e| IoError::WriteFile {
            path: path.clone(),
            source: e,
        })?;
        let mut report = Self {
            path,
            csv: csv::Writer::from_writer(file),
            with_path_len,
            path_dir,
            rows: 0,
        };
        let mut header = vec!["word", "predicted", "correct", "distance"];
        if with_path_len {
            header.push("path_len");
        }
        report.write_row(&header)?;
        Ok(report)
    }

    /// Return the CSV file path.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the number of result rows written.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Flush the CSV file and return its path.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::WriteFile`] if the flush fails.
    pub fn finish(mut self) -> Result<PathBuf, IoError> {
        self.csv.flush().map_err(|e| IoError::WriteFile {
            path: self.path.clone(),
            source: e,
        })?;
        info!(path = %self.path.display(), rows = self.rows, "recognition report written");
        Ok(self.path)
    }

    fn write_row<I, T>(&mut self, record: I) -> Result<(), IoError>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<[u8]>,
    {
        self.csv.write_record(record).map_err(|e| IoError::CsvWrite {
            path: self.path.clone(),
            source: e,
        })
    }

    fn write_path(dir: &Path, result: &ClassificationResult, path: &AlignmentPath) -> Result<(), IoError> {
        let file = dir.join(format!("path_word{}.csv", result.input));
        let mut csv = csv::Writer::from_path(&file).map_err(|e| IoError::CsvWrite {
            path: file.clone(),
            source: e,
        })?;
        let csv_err = |e| IoError::CsvWrite {
            path: file.clone(),
            source: e,
        };
        csv.write_record(["template_index", "input_index"]).map_err(csv_err)?;
        for step in path {
            csv.serialize((step.template, step.input)).map_err(csv_err)?;
        }
        csv.flush().map_err(|e| IoError::WriteFile {
            path: file.clone(),
            source: e,
        })?;
        debug!(path = %file.display(), steps = path.len(), "path written");
        Ok(())
    }
}

impl OutcomeReporter for RecognitionReport {
    type Error = IoError;

    fn report(&mut self, result: &ClassificationResult) -> Result<(), IoError> {
        let mut row = vec![
            result.input.to_string(),
            result.predicted.map(|p| p.to_string()).unwrap_or_default(),
            result.correct.to_string(),
            result.distance.map(|d| d.to_string()).unwrap_or_default(),
        ];
        if self.with_path_len {
            row.push(result.path_len().to_string());
        }
        self.write_row(&row)?;
        self.rows += 1;

        if let (Some(dir), Some(path)) = (&self.path_dir, &result.path) {
            Self::write_path(dir, result, path)?;
        }
        Ok(())
    }
}

/// JSON view of one or more batch runs over the same corpus.
#[derive(Debug, Serialize)]
pub struct SummaryReport {
    experiment: String,
    runs: Vec<RunEntry>,
}

#[derive(Debug, Serialize)]
struct RunEntry {
    weight: f64,
    total: usize,
    correct: usize,
    accuracy: Option<f64>,
    global_min_distance: Option<f64>,
    skipped_inputs: Vec<u32>,
    skipped_templates: Vec<u32>,
    skipped_pairs: usize,
    misrecognized: Vec<Misrecognition>,
}

#[derive(Debug, Serialize)]
struct Misrecognition {
    word: u32,
    predicted: Option<u32>,
}

impl SummaryReport {
    /// Build a report from the summaries of each run, in run order.
    pub fn new(experiment: &ExperimentName, summaries: &[BatchSummary]) -> Self {
        let runs = summaries
            .iter()
            .map(|s| RunEntry {
                weight: s.weight,
                total: s.total,
                correct: s.correct,
                accuracy: s.accuracy(),
                global_min_distance: s.global_min_distance.map(|d| d.value()),
                skipped_inputs: s.skipped_inputs.iter().map(|id| id.number()).collect(),
                skipped_templates: s.skipped_templates.iter().map(|id| id.number()).collect(),
                skipped_pairs: s.skipped_pairs,
                misrecognized: s
                    .misrecognized
                    .iter()
                    .map(|(word, predicted)| Misrecognition {
                        word: word.number(),
                        predicted: predicted.map(|p| p.number()),
                    })
                    .collect(),
            })
            .collect();
        Self {
            experiment: experiment.as_str().to_string(),
            runs,
        }
    }

    /// Render the report as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns the serializer error if rendering fails.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}
