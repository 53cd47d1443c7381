//! Capture-time correction for cameras whose clock drifted.
//!
//! Every recognised file gets the same signed offset added to its
//! `DateTimeOriginal`, either rewritten in place or written to a copy in a
//! separate, flat output directory.

use crate::error::SortError;
use crate::photosort::metadata::MetadataSource;
use crate::photosort::scan::{ExtensionSet, list_files_by_extension};
use chrono::{NaiveDateTime, TimeDelta};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OffsetMode {
    InPlace,
    KeepOriginal { out_dir: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OffsetChange {
    pub source: PathBuf,
    pub destination: PathBuf,
    pub before: NaiveDateTime,
    pub after: NaiveDateTime,
}

impl OffsetChange {
    pub fn in_place(&self) -> bool {
        self.source == self.destination
    }
}

/// Signed `hours:minutes` offset; `None` if it cannot be represented.
pub fn offset_from(hours: i64, minutes: i64) -> Option<TimeDelta> {
    TimeDelta::try_hours(hours)?.checked_add(&TimeDelta::try_minutes(minutes)?)
}

/// All recognised files under every input root, sorted by full path.
pub fn collect_files(
    input_roots: &[PathBuf],
    extensions: &ExtensionSet,
) -> Result<Vec<PathBuf>, SortError> {
    let mut files = Vec::new();
    for root in input_roots {
        files.extend(list_files_by_extension(root, extensions)?);
    }
    files.sort();
    files.dedup();
    Ok(files)
}

fn destination_for(source: &Path, mode: &OffsetMode) -> PathBuf {
    match mode {
        OffsetMode::InPlace => source.to_path_buf(),
        OffsetMode::KeepOriginal { out_dir } => match source.file_name() {
            Some(name) => out_dir.join(name),
            None => source.to_path_buf(),
        },
    }
}

/// `out_dir` with symlinks and `..` resolved, so destinations can be compared
/// against the inputs they must never overwrite.
fn resolved_out_dir(mode: &OffsetMode) -> Result<Option<PathBuf>, SortError> {
    match mode {
        OffsetMode::InPlace => Ok(None),
        OffsetMode::KeepOriginal { out_dir } => fs::canonicalize(out_dir)
            .map(Some)
            .map_err(|source| SortError::DirectoryCreation {
                path: out_dir.clone(),
                source,
            }),
    }
}

/// Read every capture time and work out where the shifted file goes.
/// Nothing is written.
///
/// Under [`OffsetMode::KeepOriginal`] a destination that resolves to any
/// input file is fatal, whichever way `out_dir` was spelled.
pub fn plan_offsets(
    files: &[PathBuf],
    delta: TimeDelta,
    mode: &OffsetMode,
    metadata: &dyn MetadataSource,
) -> Result<Vec<OffsetChange>, SortError> {
    let out_dir = resolved_out_dir(mode)?;
    let originals: HashMap<PathBuf, &PathBuf> = match out_dir {
        Some(_) => files
            .iter()
            .map(|file| (fs::canonicalize(file).unwrap_or_else(|_| file.clone()), file))
            .collect(),
        None => HashMap::new(),
    };

    let mut claimed: HashMap<PathBuf, PathBuf> = HashMap::new();
    let mut changes = Vec::with_capacity(files.len());
    for source in files {
        let before = metadata.read_capture_time(source)?;
        let after = before.checked_add_signed(delta).ok_or_else(|| {
            SortError::metadata(source, format!("{before} shifted by {delta} is out of range"))
        })?;
        let destination = destination_for(source, mode);
        let key = match &out_dir {
            None => destination.clone(),
            Some(dir) => {
                let key = dir.join(destination.file_name().unwrap_or_default());
                let clobbered = if destination == *source {
                    Some(source)
                } else {
                    originals.get(&key).copied()
                };
                if let Some(original) = clobbered {
                    return Err(SortError::OverwritesOriginal {
                        original: original.clone(),
                        destination,
                    });
                }
                key
            }
        };
        if let Some(first) = claimed.insert(key, source.clone()) {
            return Err(SortError::OffsetCollision {
                first,
                second: source.clone(),
                target: destination,
            });
        }
        changes.push(OffsetChange {
            source: source.clone(),
            destination,
            before,
            after,
        });
    }
    Ok(changes)
}

pub fn apply_offset(change: &OffsetChange, metadata: &dyn MetadataSource) -> Result<(), SortError> {
    if !change.in_place() {
        fs::copy(&change.source, &change.destination).map_err(|source| SortError::FileCopy {
            from: change.source.clone(),
            to: change.destination.clone(),
            source,
        })?;
    }
    metadata.rewrite_capture_time(&change.destination, change.after)
}

pub fn ensure_out_dir(out_dir: &Path) -> Result<(), SortError> {
    if out_dir.is_dir() {
        return Ok(());
    }
    Err(SortError::DirectoryCreation {
        path: out_dir.to_path_buf(),
        source: io::Error::new(io::ErrorKind::NotFound, "output directory does not exist"),
    })
}
