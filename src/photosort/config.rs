use crate::photosort::paths::PhotosortPaths;
use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::env;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtensionConfig {
    pub jpeg: Vec<String>,
    pub raw: Vec<String>,
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self {
            jpeg: ["JPG", "JPEG", "JFIF"].map(String::from).to_vec(),
            raw: ["RAW", "RAF", "DNG", "DXF"].map(String::from).to_vec(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub split_raw: bool,
    pub jpg_dir: String,
    pub raw_dir: String,
    pub rename_files: bool,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            split_raw: true,
            jpg_dir: "JPG".to_string(),
            raw_dir: "RAW".to_string(),
            rename_files: true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct PhotosortConfig {
    pub extensions: ExtensionConfig,
    pub layout: LayoutConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
struct PartialPhotosortConfig {
    extensions: Option<ExtensionConfig>,
    layout: Option<LayoutConfig>,
}

type EnvLookup<'a> = &'a dyn Fn(&str) -> Option<String>;

fn env_or_bool(lookup: EnvLookup<'_>, var: &str, fallback: bool) -> bool {
    match lookup(var) {
        Some(v) => match v.trim() {
            "1" | "true" | "TRUE" | "yes" | "on" => true,
            "0" | "false" | "FALSE" | "no" | "off" => false,
            _ => fallback,
        },
        None => fallback,
    }
}

fn env_or_string(lookup: EnvLookup<'_>, var: &str, fallback: &str) -> String {
    match lookup(var) {
        Some(v) if !v.trim().is_empty() => v.trim().to_string(),
        _ => fallback.to_string(),
    }
}

fn env_or_csv(lookup: EnvLookup<'_>, var: &str, fallback: &[String]) -> Vec<String> {
    match lookup(var) {
        Some(v) => {
            let out = v
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToOwned::to_owned)
                .collect::<Vec<_>>();
            if out.is_empty() { fallback.to_vec() } else { out }
        }
        None => fallback.to_vec(),
    }
}

fn is_single_component(name: &str) -> bool {
    let mut components = Path::new(name).components();
    matches!(
        (components.next(), components.next()),
        (Some(std::path::Component::Normal(_)), None)
    )
}

pub fn validate(cfg: &PhotosortConfig) -> Result<()> {
    if cfg.extensions.jpeg.is_empty() {
        return Err(anyhow!("invalid extensions: jpeg list cannot be empty"));
    }
    if cfg.extensions.raw.is_empty() {
        return Err(anyhow!("invalid extensions: raw list cannot be empty"));
    }
    let jpeg: BTreeSet<String> = cfg
        .extensions
        .jpeg
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_uppercase())
        .collect();
    if let Some(shared) = cfg
        .extensions
        .raw
        .iter()
        .map(|e| e.trim_start_matches('.').to_ascii_uppercase())
        .find(|e| jpeg.contains(e))
    {
        return Err(anyhow!(
            "invalid extensions: `{shared}` is listed as both jpeg and raw"
        ));
    }
    for (key, value) in [
        ("jpg_dir", &cfg.layout.jpg_dir),
        ("raw_dir", &cfg.layout.raw_dir),
    ] {
        if !is_single_component(value) {
            return Err(anyhow!(
                "invalid layout {key} `{value}`: must be a single directory name"
            ));
        }
    }
    if cfg.layout.split_raw && cfg.layout.jpg_dir == cfg.layout.raw_dir {
        return Err(anyhow!(
            "invalid layout: jpg_dir and raw_dir must differ when split_raw is on"
        ));
    }
    Ok(())
}

fn merge_file_config(base: &mut PhotosortConfig, path: &Path) -> Result<()> {
    if !path.exists() {
        return Ok(());
    }

    let raw = fs::read_to_string(path)?;
    let parsed: PartialPhotosortConfig = toml::from_str(&raw)
        .map_err(|err| anyhow!("failed to parse photosort config {}: {err}", path.display()))?;
    if let Some(extensions) = parsed.extensions {
        base.extensions = extensions;
    }
    if let Some(layout) = parsed.layout {
        base.layout = layout;
    }
    Ok(())
}

fn merge_env(cfg: &mut PhotosortConfig, lookup: EnvLookup<'_>) {
    cfg.layout.split_raw = env_or_bool(lookup, "PHOTOSORT_SPLIT_RAW", cfg.layout.split_raw);
    cfg.layout.rename_files =
        env_or_bool(lookup, "PHOTOSORT_RENAME_FILES", cfg.layout.rename_files);
    cfg.layout.jpg_dir = env_or_string(lookup, "PHOTOSORT_JPG_DIR", &cfg.layout.jpg_dir);
    cfg.layout.raw_dir = env_or_string(lookup, "PHOTOSORT_RAW_DIR", &cfg.layout.raw_dir);
    cfg.extensions.jpeg = env_or_csv(lookup, "PHOTOSORT_JPEG_EXTENSIONS", &cfg.extensions.jpeg);
    cfg.extensions.raw = env_or_csv(lookup, "PHOTOSORT_RAW_EXTENSIONS", &cfg.extensions.raw);
}

fn load_config_with(path: &Path, lookup: EnvLookup<'_>) -> Result<PhotosortConfig> {
    let mut cfg = PhotosortConfig::default();
    merge_file_config(&mut cfg, path)?;
    merge_env(&mut cfg, lookup);
    validate(&cfg)?;
    Ok(cfg)
}

pub fn load_config(paths: &PhotosortPaths) -> Result<PhotosortConfig> {
    load_config_with(&paths.config_file, &|var| env::var(var).ok())
}
