use crate::error::SortError;
use crate::photosort::config::ExtensionConfig;
use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Case-insensitive set of file extensions, stored upper-case without the dot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtensionSet(BTreeSet<String>);

impl ExtensionSet {
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self(
            extensions
                .into_iter()
                .map(|e| e.as_ref().trim_start_matches('.').to_ascii_uppercase())
                .filter(|e| !e.is_empty())
                .collect(),
        )
    }

    pub fn union(&self, other: &ExtensionSet) -> Self {
        Self(self.0.union(&other.0).cloned().collect())
    }

    pub fn matches(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.0.contains(&ext.to_ascii_uppercase()))
    }
}

#[derive(Debug, Clone)]
pub struct ScanRules {
    pub jpeg: ExtensionSet,
    pub raw: ExtensionSet,
}

impl From<&ExtensionConfig> for ScanRules {
    fn from(cfg: &ExtensionConfig) -> Self {
        Self {
            jpeg: ExtensionSet::new(&cfg.jpeg),
            raw: ExtensionSet::new(&cfg.raw),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    pub jpeg_paths: Vec<PathBuf>,
    pub raw_paths: Vec<PathBuf>,
}

/// Recursively list regular files under `root` whose extension is in `extensions`.
pub fn list_files_by_extension(
    root: &Path,
    extensions: &ExtensionSet,
) -> Result<Vec<PathBuf>, SortError> {
    if !root.is_dir() {
        return Err(SortError::MissingInputRoot(root.to_path_buf()));
    }
    let mut out = Vec::new();
    for entry in WalkDir::new(root).follow_links(true) {
        let entry = entry.map_err(|err| {
            let path = err.path().unwrap_or(root).to_path_buf();
            let source = err
                .into_io_error()
                .unwrap_or_else(|| std::io::Error::other("filesystem loop detected"));
            SortError::Listing { path, source }
        })?;
        if entry.file_type().is_file() && extensions.matches(entry.path()) {
            out.push(entry.into_path());
        }
    }
    Ok(out)
}

pub fn scan(input_roots: &[PathBuf], rules: &ScanRules) -> Result<ScanOutcome, SortError> {
    let mut outcome = ScanOutcome::default();
    for root in input_roots {
        outcome
            .jpeg_paths
            .extend(list_files_by_extension(root, &rules.jpeg)?);
        outcome
            .raw_paths
            .extend(list_files_by_extension(root, &rules.raw)?);
    }
    outcome.jpeg_paths.sort();
    outcome.jpeg_paths.dedup();
    outcome.raw_paths.sort();
    outcome.raw_paths.dedup();
    Ok(outcome)
}
