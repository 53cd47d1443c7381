use anyhow::Result;

use crate::commands::CommandReport;
use crate::photosort::audit::audit_log_path;
use crate::photosort::config::load_config;
use crate::photosort::paths::resolve_paths;

pub fn run() -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("status");

    report.detail(format!("home={}", paths.home.display()));
    report.detail(format!("logs_dir={}", paths.logs_dir.display()));
    report.detail(format!("audit_log={}", audit_log_path(&paths).display()));
    report.detail(format!("config_file={}", paths.config_file.display()));

    match load_config(&paths) {
        Ok(cfg) => {
            report.detail(format!("extensions.jpeg={}", cfg.extensions.jpeg.join(",")));
            report.detail(format!("extensions.raw={}", cfg.extensions.raw.join(",")));
            report.detail(format!("layout.split_raw={}", cfg.layout.split_raw));
            report.detail(format!("layout.jpg_dir={}", cfg.layout.jpg_dir));
            report.detail(format!("layout.raw_dir={}", cfg.layout.raw_dir));
            report.detail(format!("layout.rename_files={}", cfg.layout.rename_files));
        }
        Err(err) => report.issue(format!("config invalid: {err:#}")),
    }

    if !paths.config_file.exists() {
        report.detail("config file not found; using built-in defaults");
    }

    Ok(report)
}
