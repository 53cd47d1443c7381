use anyhow::Result;
use std::env;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct PhotosortPaths {
    pub home: PathBuf,
    pub logs_dir: PathBuf,
    pub config_file: PathBuf,
}

fn required_home_dir() -> Result<PathBuf> {
    if let Some(home) = dirs::home_dir() {
        return Ok(home);
    }
    Err(anyhow::anyhow!("HOME directory could not be resolved"))
}

fn env_or_default_path(var: &str, fallback: PathBuf) -> PathBuf {
    match env::var(var) {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => fallback,
    }
}

pub fn resolve_paths() -> Result<PhotosortPaths> {
    let home = match env::var("PHOTOSORT_HOME") {
        Ok(v) if !v.trim().is_empty() => PathBuf::from(v.trim()),
        _ => required_home_dir()?.join(".photosort"),
    };
    let logs_dir = env_or_default_path("PHOTOSORT_LOGS_DIR", home.join("logs"));
    let config_file = env_or_default_path("PHOTOSORT_CONFIG_PATH", home.join("photosort.toml"));

    Ok(PhotosortPaths {
        home,
        logs_dir,
        config_file,
    })
}
