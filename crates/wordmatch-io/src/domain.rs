//! Domain types for wordmatch-io.

use std::path::{Path, PathBuf};

use wordmatch_classify::WordId;

use crate::IoError;

/// A validated experiment name for output file naming.
///
/// Must match `[a-zA-Z0-9_-]+`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperimentName(String);

impl ExperimentName {
    /// Parse and validate an experiment name.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::InvalidExperimentName`] if the name is empty or
    /// contains characters outside `[a-zA-Z0-9_-]`.
    pub fn new(name: String) -> Result<Self, IoError> {
        if name.is_empty()
            || !name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-')
        {
            return Err(IoError::InvalidExperimentName { name });
        }
        Ok(Self(name))
    }

    /// Return the experiment name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ExperimentName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Where the recordings of one speaker set live on disk.
///
/// Word `n` of set `s` is stored at `{dir}/{stem}{s:03}_{n:03}.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SetLayout {
    dir: PathBuf,
    stem: String,
    set: u32,
}

impl SetLayout {
    /// File stem used by the recognition corpus.
    pub const DEFAULT_STEM: &'static str = "city";

    /// Describe set `set` stored in `dir` with the default stem.
    pub fn new(dir: &Path, set: u32) -> Self {
        Self {
            dir: dir.to_path_buf(),
            stem: Self::DEFAULT_STEM.to_string(),
            set,
        }
    }

    /// Override the file-name stem.
    #[must_use]
    pub fn with_stem(mut self, stem: impl Into<String>) -> Self {
        self.stem = stem.into();
        self
    }

    /// Return the directory holding the set.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Return the set number.
    pub fn set(&self) -> u32 {
        self.set
    }

    /// Return the file path of word `id`.
    #[must_use]
    pub fn path_for(&self, id: WordId) -> PathBuf {
        self.dir
            .join(format!("{}{:03}_{:03}.txt", self.stem, self.set, id.number()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn experiment_name_valid() {
        let name = ExperimentName::new("my-experiment_01".to_string());
        assert!(name.is_ok());
        assert_eq!(name.unwrap().as_str(), "my-experiment_01");
    }

    #[test]
    fn experiment_name_rejects_empty() {
        let name = ExperimentName::new(String::new());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn experiment_name_rejects_special_chars() {
        let name = ExperimentName::new("my experiment!".to_string());
        assert!(matches!(name, Err(IoError::InvalidExperimentName { .. })));
    }

    #[test]
    fn layout_formats_padded_names() {
        let layout = SetLayout::new(Path::new("/data/city011"), 11);
        assert_eq!(
            layout.path_for(WordId::new(7)),
            PathBuf::from("/data/city011/city011_007.txt")
        );
        let custom = layout.with_stem("town");
        assert_eq!(
            custom.path_for(WordId::new(100)),
            PathBuf::from("/data/city011/town011_100.txt")
        );
    }
}
