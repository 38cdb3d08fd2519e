//! End-to-end integration tests: sequence files -> classify -> CSV/JSON -> parse back.

use std::fs;
use std::path::Path;

use tempfile::TempDir;
use wordmatch_classify::{ClassificationResult, ClassifierConfig};
use wordmatch_dtw::{DEFAULT_DIM, DpMatcher};
use wordmatch_io::{
    ExperimentName, ResultWriter, SequenceDirectory, SequenceReader, SetLayout, SummaryReport,
};

const WORDS: u32 = 5;

/// Frame `i` of word `w`: a ramp whose slope and offset identify the word.
fn frame(word: u32, i: usize, jitter: f64) -> Vec<f64> {
    (0..DEFAULT_DIM)
        .map(|d| word as f64 * 3.0 + (i as f64) * 0.01 * word as f64 + d as f64 * 0.01 + jitter)
        .collect()
}

/// Write `{dir}/city{set:03}_{word:03}.txt` in the recording format.
fn write_word(dir: &Path, set: u32, word: u32, frames: usize, jitter: f64) {
    let mut text = format!("speaker {set}\nword {word}\n{frames}\n");
    for i in 0..frames {
        let line: Vec<String> = frame(word, i, jitter).iter().map(|v| format!("{v:.6}")).collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    fs::write(dir.join(format!("city{set:03}_{word:03}.txt")), text).unwrap();
}

/// Templates in set 11, inputs in set 12 with different lengths and a small offset.
fn make_corpus(root: &Path) -> (SequenceDirectory, SequenceDirectory) {
    let tdir = root.join("city011");
    let idir = root.join("city012");
    fs::create_dir_all(&tdir).unwrap();
    fs::create_dir_all(&idir).unwrap();
    for w in 1..=WORDS {
        write_word(&tdir, 11, w, 8 + w as usize, 0.0);
        write_word(&idir, 12, w, 10, 0.05);
    }
    let reader = SequenceReader::default();
    (
        SequenceDirectory::new(SetLayout::new(&tdir, 11), reader),
        SequenceDirectory::new(SetLayout::new(&idir, 12), reader),
    )
}

#[test]
fn recognize_round_trip() {
    let dir = TempDir::new().unwrap();
    let (templates, inputs) = make_corpus(dir.path());
    let out = dir.path().join("out");

    let config = ClassifierConfig::new(WORDS)
        .unwrap()
        .with_matcher(DpMatcher::default().with_path_tracking(true));
    let set = config.load_templates(&templates);
    assert_eq!(set.len(), WORDS as usize);

    let writer = ResultWriter::new(&out, ExperimentName::new("rt".into()).unwrap()).unwrap();
    let mut report = writer.recognition_report(true).unwrap();
    let summary = config.classify(&set, &inputs, &mut report).unwrap();
    let csv_path = report.finish().unwrap();

    assert_eq!(summary.accuracy(), Some(100.0));

    let mut rdr = csv::Reader::from_path(&csv_path).unwrap();
    let headers = rdr.headers().unwrap().clone();
    assert_eq!(
        headers.iter().collect::<Vec<_>>(),
        vec!["word", "predicted", "correct", "distance", "path_len"]
    );
    let rows: Vec<csv::StringRecord> = rdr.records().map(Result::unwrap).collect();
    assert_eq!(rows.len(), WORDS as usize);
    for (k, row) in rows.iter().enumerate() {
        let word = format!("{:03}", k + 1);
        assert_eq!(&row[0], word);
        assert_eq!(&row[1], word);
        assert_eq!(&row[2], "true");
        let distance: f64 = row[3].parse().unwrap();
        assert!(distance >= 0.0);
        let path_len: usize = row[4].parse().unwrap();

        let path_csv = out.join("rt_paths").join(format!("path_word{word}.csv"));
        let steps: Vec<(usize, usize)> = csv::Reader::from_path(&path_csv)
            .unwrap()
            .deserialize()
            .map(Result::unwrap)
            .collect();
        assert_eq!(steps.len(), path_len);
        assert_eq!(steps.first(), Some(&(0, 0)));
        assert_eq!(steps.last(), Some(&(8 + k, 9)));
    }

    let report = SummaryReport::new(writer.experiment(), &[summary]);
    let json_path = writer.write_summary(&report).unwrap();
    let content: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&json_path).unwrap()).unwrap();
    assert_eq!(content["experiment"], "rt");
    assert_eq!(content["runs"][0]["total"], WORDS as u64);
    assert_eq!(content["runs"][0]["accuracy"], 100.0);
}

#[test]
fn sweep_writes_one_csv_per_weight() {
    let dir = TempDir::new().unwrap();
    let (templates, inputs) = make_corpus(dir.path());
    let writer = ResultWriter::new(dir.path(), ExperimentName::new("sw".into()).unwrap()).unwrap();

    let base = ClassifierConfig::new(WORDS).unwrap();
    let set = base.load_templates(&templates);
    let mut summaries = Vec::new();
    for weight in [0.5, 1.0, 2.0] {
        let config = base.clone().with_matcher(DpMatcher::new(weight).unwrap());
        let mut report = writer.sweep_report(weight).unwrap();
        summaries.push(config.classify(&set, &inputs, &mut report).unwrap());
        report.finish().unwrap();
    }

    for name in ["sw_weight_0.5.csv", "sw_weight_1.0.csv", "sw_weight_2.0.csv"] {
        let content = fs::read_to_string(dir.path().join(name)).unwrap();
        assert_eq!(content.lines().count(), WORDS as usize + 1, "{name}");
    }

    let json: serde_json::Value =
        serde_json::from_str(&SummaryReport::new(writer.experiment(), &summaries).to_json().unwrap())
            .unwrap();
    let runs = json["runs"].as_array().unwrap();
    assert_eq!(runs.len(), 3);
    assert_eq!(runs[0]["weight"], 0.5);
    assert_eq!(runs[2]["weight"], 2.0);
}

#[test]
fn missing_and_malformed_files_are_skipped() {
    let dir = TempDir::new().unwrap();
    let (templates, inputs) = make_corpus(dir.path());
    // corrupt template 2 and remove input 4
    fs::write(dir.path().join("city011/city011_002.txt"), "h1\nh2\n3\n1.0 2.0\n").unwrap();
    fs::remove_file(dir.path().join("city012/city012_004.txt")).unwrap();

    let config = ClassifierConfig::new(WORDS).unwrap();
    let set = config.load_templates(&templates);
    let mut results: Vec<ClassificationResult> = Vec::new();
    let summary = config.classify(&set, &inputs, &mut results).unwrap();

    assert_eq!(set.skipped(), summary.skipped_templates.as_slice());
    assert_eq!(summary.skipped_templates.len(), 1);
    assert_eq!(summary.skipped_inputs.len(), 1);
    assert_eq!(summary.total, WORDS as usize - 1);
    assert!(results.iter().all(|r| r.candidates == WORDS as usize - 1));
    // input 2 lost its own template and must be misrecognized
    assert_eq!(summary.correct, WORDS as usize - 2);
}
