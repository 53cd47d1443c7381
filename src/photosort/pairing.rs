//! JPEG/RAW pairing.
//!
//! A JPEG and a RAW belong to the same capture when they share a file stem
//! and a containing directory. Each RAW is consumed by at most one asset;
//! RAWs nobody claims become RAW-only assets with their own capture time.

use crate::error::SortError;
use crate::photosort::metadata::MetadataSource;
use crate::photosort::target::TargetSubdir;
use chrono::NaiveDateTime;
use std::collections::{HashMap, HashSet};
use std::ffi::OsString;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    pub jpeg_path: Option<PathBuf>,
    pub raw_path: Option<PathBuf>,
    pub captured_at: NaiveDateTime,
    pub target_subdir: TargetSubdir,
    pub jpeg_destinations: Vec<PathBuf>,
    pub raw_destinations: Vec<PathBuf>,
}

impl Asset {
    pub fn from_jpeg(jpeg: PathBuf, raw: Option<PathBuf>, captured_at: NaiveDateTime) -> Self {
        Self {
            jpeg_path: Some(jpeg),
            raw_path: raw,
            captured_at,
            target_subdir: TargetSubdir::derive(captured_at),
            jpeg_destinations: Vec::new(),
            raw_destinations: Vec::new(),
        }
    }

    pub fn from_raw(raw: PathBuf, captured_at: NaiveDateTime) -> Self {
        Self {
            jpeg_path: None,
            raw_path: Some(raw),
            captured_at,
            target_subdir: TargetSubdir::derive(captured_at),
            jpeg_destinations: Vec::new(),
            raw_destinations: Vec::new(),
        }
    }

    pub fn is_paired(&self) -> bool {
        self.jpeg_path.is_some() && self.raw_path.is_some()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct PairingKey {
    stem: OsString,
    parent: PathBuf,
}

impl PairingKey {
    fn of(path: &Path) -> Option<Self> {
        Some(Self {
            stem: path.file_stem()?.to_os_string(),
            parent: path.parent()?.to_path_buf(),
        })
    }
}

/// RAW candidates grouped by pairing key; claiming a key removes it.
#[derive(Debug, Default)]
struct RawIndex {
    by_key: HashMap<PairingKey, Vec<PathBuf>>,
}

impl RawIndex {
    fn build(raw_paths: &[PathBuf]) -> Self {
        let mut by_key: HashMap<PairingKey, Vec<PathBuf>> = HashMap::new();
        for raw in raw_paths {
            if let Some(key) = PairingKey::of(raw) {
                by_key.entry(key).or_default().push(raw.clone());
            }
        }
        Self { by_key }
    }

    fn claim(&mut self, jpeg: &Path) -> Result<Option<PathBuf>, SortError> {
        let Some(key) = PairingKey::of(jpeg) else {
            return Ok(None);
        };
        match self.by_key.get(&key).map(Vec::len) {
            None | Some(0) => Ok(None),
            Some(1) => Ok(self.by_key.remove(&key).and_then(|mut v| v.pop())),
            Some(_) => Err(SortError::AmbiguousPairing {
                jpeg: jpeg.to_path_buf(),
                candidates: self.by_key[&key].clone(),
            }),
        }
    }
}

pub fn pair(
    jpeg_paths: &[PathBuf],
    raw_paths: &[PathBuf],
    metadata: &dyn MetadataSource,
) -> Result<Vec<Asset>, SortError> {
    let mut index = RawIndex::build(raw_paths);
    let mut consumed: HashSet<PathBuf> = HashSet::new();
    let mut assets = Vec::with_capacity(jpeg_paths.len() + raw_paths.len());

    for jpeg in jpeg_paths {
        let captured_at = metadata.read_capture_time(jpeg)?;
        let raw = index.claim(jpeg)?;
        if let Some(raw) = &raw {
            consumed.insert(raw.clone());
        }
        assets.push(Asset::from_jpeg(jpeg.clone(), raw, captured_at));
    }

    for raw in raw_paths {
        if consumed.contains(raw) {
            continue;
        }
        let captured_at = metadata.read_capture_time(raw)?;
        assets.push(Asset::from_raw(raw.clone(), captured_at));
    }

    Ok(assets)
}
