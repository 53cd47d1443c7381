use chrono::{Datelike, NaiveDateTime};
use std::fmt;
use std::path::PathBuf;

pub const DAY_DIR_FORMAT: &str = "%Y-%m-%d";
pub const RENAME_PREFIX_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";

/// Canonical `<year>/<YYYY-MM-DD>` location of a capture day, relative to an output root.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TargetSubdir {
    pub year: String,
    pub day: String,
}

impl TargetSubdir {
    pub fn derive(captured_at: NaiveDateTime) -> Self {
        Self {
            year: format!("{:04}", captured_at.year()),
            day: captured_at.format(DAY_DIR_FORMAT).to_string(),
        }
    }

    pub fn relative_path(&self) -> PathBuf {
        PathBuf::from(&self.year).join(&self.day)
    }
}

impl fmt::Display for TargetSubdir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.year, self.day)
    }
}
