pub mod sort;
pub mod status;
pub mod time_offset;

use crate::photosort::audit;
use crate::photosort::paths::PhotosortPaths;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CommandReport {
    pub command: String,
    pub ok: bool,
    pub details: Vec<String>,
    pub issues: Vec<String>,
}

impl CommandReport {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
            ok: true,
            details: Vec::new(),
            issues: Vec::new(),
        }
    }

    pub fn detail(&mut self, text: impl Into<String>) {
        self.details.push(text.into());
    }

    pub fn issue(&mut self, text: impl Into<String>) {
        self.ok = false;
        self.issues.push(text.into());
    }
}

/// Record the run in the audit log. A broken log never fails the command.
pub fn audit_run(
    report: &mut CommandReport,
    paths: &PhotosortPaths,
    status: &str,
    message: &str,
) {
    if let Err(err) = audit::append_event(paths, &report.command, status, message) {
        report.detail(format!("audit.write_failed={err:#}"));
    }
}
