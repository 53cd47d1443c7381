use std::path::PathBuf;
use thiserror::Error;

fn display_paths(paths: &[PathBuf]) -> String {
    paths
        .iter()
        .map(|p| p.display().to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

#[derive(Debug, Error)]
pub enum SortError {
    #[error("input directory does not exist: {}", .0.display())]
    MissingInputRoot(PathBuf),
    #[error("output directory does not exist: {}", .0.display())]
    MissingOutputRoot(PathBuf),
    #[error("failed to list {}", path.display())]
    Listing {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to read capture time from {}: {reason}", path.display())]
    Metadata { path: PathBuf, reason: String },
    #[error(
        "ambiguous RAW pairing for {}: candidates {}",
        jpeg.display(),
        display_paths(candidates)
    )]
    AmbiguousPairing {
        jpeg: PathBuf,
        candidates: Vec<PathBuf>,
    },
    #[error(
        "ambiguous output directory for {canonical}: {} all match; rename or merge them by hand",
        display_paths(matches)
    )]
    AmbiguousDirectory {
        canonical: String,
        matches: Vec<PathBuf>,
    },
    #[error("failed to create directory {}", path.display())]
    DirectoryCreation {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to copy {} to {}", from.display(), to.display())]
    FileCopy {
        from: PathBuf,
        to: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error(
        "{} and {} would both be written to {}",
        first.display(),
        second.display(),
        target.display()
    )]
    OffsetCollision {
        first: PathBuf,
        second: PathBuf,
        target: PathBuf,
    },
    #[error(
        "{} would overwrite the original {}; choose an --out-dir outside the inputs",
        destination.display(),
        original.display()
    )]
    OverwritesOriginal {
        original: PathBuf,
        destination: PathBuf,
    },
}

impl SortError {
    pub fn metadata(path: impl Into<PathBuf>, reason: impl ToString) -> Self {
        Self::Metadata {
            path: path.into(),
            reason: reason.to_string(),
        }
    }

    /// Stable code used in warnings and the audit log.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingInputRoot(_) => "MISSING_INPUT_ROOT",
            Self::MissingOutputRoot(_) => "MISSING_OUTPUT_ROOT",
            Self::Listing { .. } => "LISTING",
            Self::Metadata { .. } => "METADATA",
            Self::AmbiguousPairing { .. } => "AMBIGUOUS_PAIRING",
            Self::AmbiguousDirectory { .. } => "AMBIGUOUS_DIRECTORY",
            Self::DirectoryCreation { .. } => "DIRECTORY_CREATION",
            Self::FileCopy { .. } => "FILE_COPY",
            Self::OffsetCollision { .. } => "OFFSET_COLLISION",
            Self::OverwritesOriginal { .. } => "OVERWRITES_ORIGINAL",
        }
    }
}
