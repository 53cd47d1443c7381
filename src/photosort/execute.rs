use crate::error::SortError;
use crate::photosort::pairing::Asset;
use std::fs::{self, File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// `(source, destination)` pairs written (or that would be, for a dry run).
    pub copied: Vec<(PathBuf, PathBuf)>,
    /// Destinations left alone because something already exists there.
    pub skipped: Vec<PathBuf>,
    pub bytes: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CopyStatus {
    Copied(u64),
    Skipped,
}

fn copy_error(from: &Path, to: &Path, source: io::Error) -> SortError {
    SortError::FileCopy {
        from: from.to_path_buf(),
        to: to.to_path_buf(),
        source,
    }
}

/// Copy `from` to `to` unless `to` exists. The existence check and the write
/// are one `create_new` open, so nothing is ever overwritten.
fn copy_one(from: &Path, to: &Path) -> Result<CopyStatus, SortError> {
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent).map_err(|source| SortError::DirectoryCreation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut dst = match OpenOptions::new().write(true).create_new(true).open(to) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::AlreadyExists => return Ok(CopyStatus::Skipped),
        Err(err) => return Err(copy_error(from, to, err)),
    };
    let mut src = match File::open(from) {
        Ok(file) => file,
        Err(err) => {
            drop(dst);
            let _ = fs::remove_file(to);
            return Err(copy_error(from, to, err));
        }
    };

    let written = io::copy(&mut src, &mut dst).and_then(|bytes| {
        let meta = src.metadata()?;
        dst.set_permissions(meta.permissions())?;
        if let Ok(modified) = meta.modified() {
            dst.set_modified(modified)?;
        }
        dst.sync_all()?;
        Ok(bytes)
    });
    match written {
        Ok(bytes) => Ok(CopyStatus::Copied(bytes)),
        Err(err) => {
            drop(dst);
            // A truncated file would be skipped as "existing" on the next run.
            let _ = fs::remove_file(to);
            Err(copy_error(from, to, err))
        }
    }
}

fn planned_copies(asset: &Asset) -> impl Iterator<Item = (&Path, &Path)> {
    let jpeg = asset.jpeg_path.as_deref().into_iter().flat_map(move |src| {
        asset
            .jpeg_destinations
            .iter()
            .map(move |dst| (src, dst.as_path()))
    });
    let raw = asset.raw_path.as_deref().into_iter().flat_map(move |src| {
        asset
            .raw_destinations
            .iter()
            .map(move |dst| (src, dst.as_path()))
    });
    jpeg.chain(raw)
}

/// Carry out every planned copy in order. The first failure aborts the rest;
/// already-copied files stay in place.
pub fn execute(assets: &[Asset], dry_run: bool) -> Result<ExecutionOutcome, SortError> {
    let mut outcome = ExecutionOutcome::default();
    for asset in assets {
        for (from, to) in planned_copies(asset) {
            let status = if dry_run {
                match fs::symlink_metadata(to) {
                    Ok(_) => CopyStatus::Skipped,
                    Err(_) => CopyStatus::Copied(0),
                }
            } else {
                copy_one(from, to)?
            };
            match status {
                CopyStatus::Copied(bytes) => {
                    outcome.bytes += bytes;
                    outcome.copied.push((from.to_path_buf(), to.to_path_buf()));
                }
                CopyStatus::Skipped => outcome.skipped.push(to.to_path_buf()),
            }
        }
    }
    Ok(outcome)
}
