use std::collections::HashSet;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use tracing::{info, warn};

use wordmatch_classify::{BatchSummary, ClassifierConfig, TemplateSet};
use wordmatch_dtw::{DEFAULT_DIM, DEFAULT_MAX_FRAMES, DpMatcher};
use wordmatch_io::{
    ExperimentName, ResultWriter, SequenceDirectory, SequenceReader, SetLayout, SummaryReport,
    weight_label,
};

#[derive(Parser)]
#[command(name = "wordmatch")]
#[command(about = "Isolated-word recognition by DP matching against reference templates")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Enable verbose (debug-level) logging
    #[arg(long, global = true)]
    verbose: bool,

    /// Suppress all output except errors
    #[arg(long, global = true)]
    quiet: bool,
}

/// Where the corpus lives and where results go.
#[derive(Args, Debug, Clone)]
struct CorpusArgs {
    /// Directory holding the template recordings
    #[arg(long)]
    template_dir: PathBuf,

    /// Set number embedded in template file names
    #[arg(long)]
    template_set: u32,

    /// Directory holding the input recordings
    #[arg(long)]
    input_dir: PathBuf,

    /// Set number embedded in input file names
    #[arg(long)]
    input_set: u32,

    /// File-name stem shared by every recording
    #[arg(long, default_value = SetLayout::DEFAULT_STEM)]
    stem: String,

    /// Number of words in the vocabulary (ids 1..=N)
    #[arg(long, default_value_t = ClassifierConfig::DEFAULT_WORD_COUNT)]
    words: u32,

    /// Feature dimension of each frame
    #[arg(long, default_value_t = DEFAULT_DIM)]
    dim: usize,

    /// Maximum number of frames per recording (1 to 4096)
    #[arg(long, default_value_t = DEFAULT_MAX_FRAMES)]
    capacity: usize,

    /// Experiment name for output files (must match [a-zA-Z0-9_-]+)
    #[arg(long)]
    experiment: String,

    /// Output directory for result files
    #[arg(long, default_value = ".")]
    output_dir: PathBuf,
}

#[derive(Subcommand)]
enum Command {
    /// Recognize every input word with one diagonal weight
    Recognize {
        /// Weight of the diagonal DP step
        #[arg(long, default_value_t = DpMatcher::DEFAULT_WEIGHT)]
        weight: f64,

        /// Export the best alignment path of each input
        #[arg(long, default_value_t = false)]
        paths: bool,

        #[command(flatten)]
        corpus: CorpusArgs,
    },

    /// Repeat recognition once per diagonal weight
    Sweep {
        /// Comma-separated diagonal weights
        #[arg(long, value_delimiter = ',', default_value = "0.5,1.0,2.0")]
        weights: Vec<f64>,

        #[command(flatten)]
        corpus: CorpusArgs,
    },
}

/// Stdout summary.
#[derive(Serialize)]
struct Output {
    summary: SummaryReport,
    files: Vec<PathBuf>,
}

/// Everything a batch needs that does not depend on the weight.
struct Corpus {
    config: ClassifierConfig,
    templates: TemplateSet,
    inputs: SequenceDirectory,
    writer: ResultWriter,
}

impl Corpus {
    fn open(args: &CorpusArgs) -> Result<Self> {
        let experiment = ExperimentName::new(args.experiment.clone())?;
        let config = ClassifierConfig::new(args.words)?.with_capacity(args.capacity)?;

        let reader = SequenceReader::new(args.dim).with_capacity(config.capacity());
        let templates = SequenceDirectory::new(
            SetLayout::new(&args.template_dir, args.template_set).with_stem(&args.stem),
            reader,
        );
        let inputs = SequenceDirectory::new(
            SetLayout::new(&args.input_dir, args.input_set).with_stem(&args.stem),
            reader,
        );

        let templates = config.load_templates(&templates);
        if templates.is_empty() {
            warn!(
                dir = %args.template_dir.display(),
                "no template could be loaded, every input will be unrecognized"
            );
        }
        info!(
            loaded = templates.len(),
            skipped = templates.skipped().len(),
            "templates ready"
        );

        let writer = ResultWriter::new(&args.output_dir, experiment)
            .context("failed to prepare output directory")?;
        Ok(Self {
            config,
            templates,
            inputs,
            writer,
        })
    }

    fn finish(&self, summaries: &[BatchSummary], mut files: Vec<PathBuf>) -> Result<Output> {
        let summary = SummaryReport::new(self.writer.experiment(), summaries);
        files.push(
            self.writer
                .write_summary(&summary)
                .context("failed to write summary")?,
        );
        Ok(Output { summary, files })
    }
}

fn log_summary(summary: &BatchSummary) {
    match summary.accuracy() {
        Some(accuracy) => info!(
            weight = summary.weight,
            accuracy,
            correct = summary.correct,
            total = summary.total,
            global_min = summary.global_min_distance.map(|d| d.value()),
            "recognition complete"
        ),
        None => info!(weight = summary.weight, "recognition complete: no data"),
    }
}

fn recognize(args: &CorpusArgs, weight: f64, paths: bool) -> Result<Output> {
    let matcher = DpMatcher::new(weight)?.with_path_tracking(paths);
    let corpus = Corpus::open(args)?;
    let config = corpus.config.clone().with_matcher(matcher);

    let mut report = corpus
        .writer
        .recognition_report(paths)
        .context("failed to open recognition report")?;
    let summary = config
        .classify(&corpus.templates, &corpus.inputs, &mut report)
        .context("recognition failed")?;
    let csv = report.finish()?;
    log_summary(&summary);

    corpus.finish(&[summary], vec![csv])
}

/// Validate every weight and its file name before any run writes output.
fn sweep_matchers(weights: &[f64]) -> Result<Vec<DpMatcher>> {
    if weights.is_empty() {
        anyhow::bail!("at least one weight is required");
    }
    let mut labels = HashSet::new();
    weights
        .iter()
        .map(|&weight| -> Result<DpMatcher> {
            let matcher = DpMatcher::new(weight)?;
            if !labels.insert(weight_label(weight)) {
                anyhow::bail!("weight {weight} shares its report file with an earlier weight");
            }
            Ok(matcher)
        })
        .collect()
}

fn sweep(args: &CorpusArgs, weights: &[f64]) -> Result<Output> {
    let matchers = sweep_matchers(weights)?;
    let corpus = Corpus::open(args)?;

    let mut summaries = Vec::with_capacity(matchers.len());
    let mut files = Vec::with_capacity(matchers.len());
    for matcher in matchers {
        let weight = matcher.weight();
        let config = corpus.config.clone().with_matcher(matcher);
        let mut report = corpus
            .writer
            .sweep_report(weight)
            .with_context(|| format!("failed to open report for weight {weight}"))?;
        let summary = config
            .classify(&corpus.templates, &corpus.inputs, &mut report)
            .with_context(|| format!("recognition failed at weight {weight}"))?;
        files.push(report.finish()?);
        log_summary(&summary);
        summaries.push(summary);
    }

    corpus.finish(&summaries, files)
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = match (cli.verbose, cli.quiet) {
        (true, _) => "debug",
        (_, true) => "error",
        _ => "info",
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let output = match cli.command {
        Command::Recognize {
            weight,
            paths,
            corpus,
        } => recognize(&corpus, weight, paths)?,
        Command::Sweep { weights, corpus } => sweep(&corpus, &weights)?,
    };
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    fn corpus_args(root: &Path) -> CorpusArgs {
        let template_dir = root.join("t");
        let input_dir = root.join("i");
        fs::create_dir_all(&template_dir).unwrap();
        fs::create_dir_all(&input_dir).unwrap();
        fs::write(input_dir.join("city012_001.txt"), "h1\nh2\n2\n0.0 1.0\n1.0 2.0\n").unwrap();
        CorpusArgs {
            template_dir,
            template_set: 11,
            input_dir,
            input_set: 12,
            stem: SetLayout::DEFAULT_STEM.to_string(),
            words: 1,
            dim: 2,
            capacity: 16,
            experiment: "cli".to_string(),
            output_dir: root.join("out"),
        }
    }

    #[test]
    fn missing_templates_still_write_reports() {
        let dir = TempDir::new().unwrap();
        let args = corpus_args(dir.path());

        let output = recognize(&args, DpMatcher::DEFAULT_WEIGHT, false).unwrap();
        assert_eq!(output.files.len(), 2);

        let csv = fs::read_to_string(args.output_dir.join("cli_recognition.csv")).unwrap();
        let lines: Vec<&str> = csv.lines().collect();
        assert_eq!(lines, vec!["word,predicted,correct,distance", "001,,false,"]);

        let json: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(args.output_dir.join("cli_summary.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(json["runs"][0]["total"], 1);
        assert_eq!(json["runs"][0]["correct"], 0);
        assert_eq!(json["runs"][0]["skipped_templates"], serde_json::json!([1]));
    }

    #[test]
    fn sweep_rejects_bad_weight_before_any_run() {
        let dir = TempDir::new().unwrap();
        let args = corpus_args(dir.path());
        assert!(sweep(&args, &[1.0, -1.0]).is_err());
        assert!(!args.output_dir.exists());
    }

    #[test]
    fn sweep_rejects_weights_sharing_a_file() {
        assert!(sweep_matchers(&[0.2, 0.25]).is_ok());
        assert!(sweep_matchers(&[2.0, 2.0]).is_err());
        assert!(sweep_matchers(&[]).is_err());
    }

    #[test]
    fn capacity_is_bounded() {
        let dir = TempDir::new().unwrap();
        let mut args = corpus_args(dir.path());
        args.capacity = 0;
        assert!(recognize(&args, 1.0, false).is_err());
        args.capacity = ClassifierConfig::MAX_CAPACITY + 1;
        assert!(recognize(&args, 1.0, false).is_err());
        assert!(!args.output_dir.exists());
    }
}
