//! Output directory reconciliation.
//!
//! Every canonical `<year>/<YYYY-MM-DD>` directory an asset needs is mapped to
//! the directory that actually represents that day under each output root.
//! Operators may rename a day directory by appending a suffix
//! (`2024-03-01_Birthday`); such a directory is reused as long as it is the
//! only sibling starting with the canonical day name. Two or more matches
//! abort the run.
//!
//! Resolution happens for every required directory before anything is
//! created, so an ambiguity leaves the output roots untouched.

use crate::error::SortError;
use crate::photosort::target::TargetSubdir;
use std::collections::{BTreeSet, HashMap};
use std::ffi::{OsStr, OsString};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// The only accepted heuristic for renamed day directories.
pub fn matches_canonical_day(dir_name: &str, day: &str) -> bool {
    dir_name.starts_with(day)
}

#[derive(Debug, Clone, Default)]
pub struct Reconciliation {
    dirs: HashMap<(PathBuf, TargetSubdir), PathBuf>,
    /// Directories created by this run (or that would be, for a dry run), in creation order.
    pub created: Vec<PathBuf>,
    /// Suffixed directories reused in place of their canonical name.
    pub reused: Vec<PathBuf>,
}

impl Reconciliation {
    pub fn get(&self, output_root: &Path, subdir: &TargetSubdir) -> Option<&Path> {
        self.dirs
            .get(&(output_root.to_path_buf(), subdir.clone()))
            .map(PathBuf::as_path)
    }

    pub fn directory_count(&self) -> usize {
        self.dirs.len()
    }
}

/// Immediate subdirectory names per year directory, listed once per run.
#[derive(Debug, Default)]
struct SiblingCache {
    by_year_dir: HashMap<PathBuf, Option<Vec<OsString>>>,
}

impl SiblingCache {
    /// `None` when the year directory does not exist yet.
    fn siblings(&mut self, year_dir: &Path) -> Result<Option<&[OsString]>, SortError> {
        if !self.by_year_dir.contains_key(year_dir) {
            let listed = list_subdirectories(year_dir)?;
            self.by_year_dir.insert(year_dir.to_path_buf(), listed);
        }
        Ok(self.by_year_dir[year_dir].as_deref())
    }

    fn record_created(&mut self, year_dir: &Path, name: OsString) {
        self.by_year_dir
            .entry(year_dir.to_path_buf())
            .or_insert(None)
            .get_or_insert_with(Vec::new)
            .push(name);
    }
}

fn list_subdirectories(year_dir: &Path) -> Result<Option<Vec<OsString>>, SortError> {
    let listing = |source: io::Error| SortError::Listing {
        path: year_dir.to_path_buf(),
        source,
    };
    match fs::metadata(year_dir) {
        Ok(meta) if meta.is_dir() => {}
        Ok(_) => {
            return Err(SortError::DirectoryCreation {
                path: year_dir.to_path_buf(),
                source: io::Error::new(
                    io::ErrorKind::AlreadyExists,
                    "path exists and is not a directory",
                ),
            });
        }
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(listing(err)),
    }

    let mut names = Vec::new();
    for entry in fs::read_dir(year_dir).map_err(listing)? {
        let entry = entry.map_err(listing)?;
        if entry.path().is_dir() {
            names.push(entry.file_name());
        }
    }
    names.sort();
    Ok(Some(names))
}

enum Resolution {
    Existing(PathBuf),
    Create { year_dir: PathBuf, day_dir: PathBuf },
}

fn resolve_one(
    cache: &mut SiblingCache,
    output_root: &Path,
    subdir: &TargetSubdir,
) -> Result<Resolution, SortError> {
    let year_dir = output_root.join(&subdir.year);
    let siblings = cache.siblings(&year_dir)?.unwrap_or_default();
    let mut matches: Vec<PathBuf> = siblings
        .iter()
        .filter(|name| matches_canonical_day(&name.to_string_lossy(), &subdir.day))
        .map(|name| year_dir.join(name))
        .collect();

    match matches.len() {
        0 => Ok(Resolution::Create {
            day_dir: year_dir.join(&subdir.day),
            year_dir,
        }),
        1 => Ok(Resolution::Existing(matches.swap_remove(0))),
        _ => Err(SortError::AmbiguousDirectory {
            canonical: subdir.to_string(),
            matches,
        }),
    }
}

fn create_dir(path: &Path) -> Result<(), SortError> {
    fs::create_dir_all(path).map_err(|source| SortError::DirectoryCreation {
        path: path.to_path_buf(),
        source,
    })
}

/// Output roots are never created; each must already be a directory.
fn check_output_roots(output_roots: &[PathBuf]) -> Result<(), SortError> {
    match output_roots.iter().find(|root| !root.is_dir()) {
        Some(root) => Err(SortError::MissingOutputRoot(root.clone())),
        None => Ok(()),
    }
}

/// Map every `(output_root, subdir)` pair to its actual directory.
///
/// With `create == false` nothing is written; missing directories are
/// reported in [`Reconciliation::created`] as they would be created.
pub fn reconcile(
    output_roots: &[PathBuf],
    required: &BTreeSet<TargetSubdir>,
    create: bool,
) -> Result<Reconciliation, SortError> {
    check_output_roots(output_roots)?;
    let mut cache = SiblingCache::default();
    let mut resolved = Vec::with_capacity(output_roots.len() * required.len());
    for output_root in output_roots {
        for subdir in required {
            let resolution = resolve_one(&mut cache, output_root, subdir)?;
            resolved.push((output_root.clone(), subdir.clone(), resolution));
        }
    }

    let mut out = Reconciliation::default();
    for (output_root, subdir, resolution) in resolved {
        let actual = match resolution {
            Resolution::Existing(path) => {
                if path.file_name() != Some(OsStr::new(&subdir.day)) {
                    out.reused.push(path.clone());
                }
                path
            }
            Resolution::Create { year_dir, day_dir } => {
                if !year_dir.is_dir() && !out.created.contains(&year_dir) {
                    if create {
                        create_dir(&year_dir)?;
                    }
                    out.created.push(year_dir.clone());
                }
                if create {
                    create_dir(&day_dir)?;
                }
                cache.record_created(&year_dir, OsString::from(&subdir.day));
                out.created.push(day_dir.clone());
                day_dir
            }
        };
        out.dirs.insert((output_root, subdir), actual);
    }
    Ok(out)
}
