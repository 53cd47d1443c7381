use crate::error::SortError;
use crate::photosort::config::LayoutConfig;
use crate::photosort::pairing::Asset;
use crate::photosort::reconcile::Reconciliation;
use crate::photosort::target::RENAME_PREFIX_FORMAT;
use chrono::NaiveDateTime;
use std::ffi::OsString;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanOptions {
    pub rename_files: bool,
    /// `(jpg_dir, raw_dir)` subdirectories inside each day directory, when splitting.
    pub split_dirs: Option<(String, String)>,
}

impl From<&LayoutConfig> for PlanOptions {
    fn from(layout: &LayoutConfig) -> Self {
        Self {
            rename_files: layout.rename_files,
            split_dirs: layout
                .split_raw
                .then(|| (layout.jpg_dir.clone(), layout.raw_dir.clone())),
        }
    }
}

pub fn destination_file_name(
    original: &Path,
    captured_at: NaiveDateTime,
    rename_files: bool,
) -> Option<OsString> {
    let name = original.file_name()?;
    if !rename_files {
        return Some(name.to_os_string());
    }
    let mut renamed = OsString::from(format!(
        "{}-",
        captured_at.format(RENAME_PREFIX_FORMAT)
    ));
    renamed.push(name);
    Some(renamed)
}

fn destination(
    day_dir: &Path,
    subdir: Option<&str>,
    original: &Path,
    captured_at: NaiveDateTime,
    rename_files: bool,
) -> Result<PathBuf, SortError> {
    let name = destination_file_name(original, captured_at, rename_files).ok_or_else(|| {
        SortError::FileCopy {
            from: original.to_path_buf(),
            to: day_dir.to_path_buf(),
            source: io::Error::new(io::ErrorKind::InvalidInput, "source has no file name"),
        }
    })?;
    let dir = match subdir {
        Some(sub) => day_dir.join(sub),
        None => day_dir.to_path_buf(),
    };
    Ok(dir.join(name))
}

/// Fill in one JPEG and/or RAW destination per output root, in root order.
pub fn plan(
    mut assets: Vec<Asset>,
    output_roots: &[PathBuf],
    reconciled: &Reconciliation,
    opts: &PlanOptions,
) -> Result<Vec<Asset>, SortError> {
    let (jpg_sub, raw_sub) = match &opts.split_dirs {
        Some((jpg, raw)) => (Some(jpg.as_str()), Some(raw.as_str())),
        None => (None, None),
    };

    for asset in &mut assets {
        asset.jpeg_destinations.clear();
        asset.raw_destinations.clear();
        for output_root in output_roots {
            let day_dir = reconciled
                .get(output_root, &asset.target_subdir)
                .ok_or_else(|| SortError::DirectoryCreation {
                    path: output_root.join(asset.target_subdir.relative_path()),
                    source: io::Error::new(
                        io::ErrorKind::NotFound,
                        "day directory was not reconciled",
                    ),
                })?;
            if let Some(jpeg) = &asset.jpeg_path {
                asset.jpeg_destinations.push(destination(
                    day_dir,
                    jpg_sub,
                    jpeg,
                    asset.captured_at,
                    opts.rename_files,
                )?);
            }
            if let Some(raw) = &asset.raw_path {
                asset.raw_destinations.push(destination(
                    day_dir,
                    raw_sub,
                    raw,
                    asset.captured_at,
                    opts.rename_files,
                )?);
            }
        }
    }
    Ok(assets)
}
