use anyhow::{Context, Result};
use std::path::PathBuf;

use crate::commands::{CommandReport, audit_run};
use crate::photosort::config::{self, PhotosortConfig, load_config};
use crate::photosort::metadata::ExifMetadata;
use crate::photosort::organize::{OrganizeOptions, OrganizeOutcome, run_organize};
use crate::photosort::paths::{PhotosortPaths, resolve_paths};
use crate::photosort::plan::PlanOptions;
use crate::photosort::scan::ScanRules;
use crate::photosort::warn::{self, WarnEvent};

#[derive(Debug, Clone, Default)]
pub struct SortOptions {
    pub inputs: Vec<PathBuf>,
    pub outputs: Vec<PathBuf>,
    pub split_raw: Option<bool>,
    pub jpg_dir: Option<String>,
    pub raw_dir: Option<String>,
    pub rename_files: Option<bool>,
    pub dry_run: bool,
}

fn apply_overrides(cfg: &mut PhotosortConfig, opts: &SortOptions) {
    if let Some(split_raw) = opts.split_raw {
        cfg.layout.split_raw = split_raw;
    }
    if let Some(jpg_dir) = &opts.jpg_dir {
        cfg.layout.jpg_dir = jpg_dir.clone();
    }
    if let Some(raw_dir) = &opts.raw_dir {
        cfg.layout.raw_dir = raw_dir.clone();
    }
    if let Some(rename_files) = opts.rename_files {
        cfg.layout.rename_files = rename_files;
    }
}

fn describe(report: &mut CommandReport, outcome: &OrganizeOutcome, dry_run: bool) {
    report.detail(format!("found.jpeg={}", outcome.jpeg_found));
    report.detail(format!("found.raw={}", outcome.raw_found));
    report.detail(format!("assets={}", outcome.assets.len()));
    report.detail(format!("assets.paired={}", outcome.paired()));
    report.detail(format!("directories={}", outcome.reconciliation.directory_count()));
    for dir in &outcome.reconciliation.created {
        report.detail(format!("directory.created={}", dir.display()));
    }
    for dir in &outcome.reconciliation.reused {
        report.detail(format!("directory.reused={}", dir.display()));
    }
    if dry_run {
        for (from, to) in &outcome.execution.copied {
            report.detail(format!("copy.planned={} -> {}", from.display(), to.display()));
        }
    }
    report.detail(format!("copied={}", outcome.execution.copied.len()));
    report.detail(format!("copied.bytes={}", outcome.execution.bytes));
    report.detail(format!("skipped={}", outcome.execution.skipped.len()));
    for path in &outcome.execution.skipped {
        report.detail(format!("skipped.path={}", path.display()));
    }
}

fn warn_skipped(outcome: &OrganizeOutcome) {
    for path in &outcome.execution.skipped {
        let path = path.display().to_string();
        warn::emit(WarnEvent {
            code: "SKIPPED_EXISTING",
            stage: "execute",
            action: "skip",
            path: &path,
            reason: "destination already exists",
        });
    }
}

fn effective_config(paths: &PhotosortPaths, opts: &SortOptions) -> Result<PhotosortConfig> {
    let mut cfg = load_config(paths)?;
    apply_overrides(&mut cfg, opts);
    config::validate(&cfg).context("invalid sort options")?;
    Ok(cfg)
}

pub fn run(opts: &SortOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("sort");
    let cfg = match effective_config(&paths, opts) {
        Ok(cfg) => cfg,
        Err(err) => {
            audit_run(&mut report, &paths, "failed", &format!("code=CONFIG {err:#}"));
            return Err(err);
        }
    };

    for input in &opts.inputs {
        report.detail(format!("input={}", input.display()));
    }
    for output in &opts.outputs {
        report.detail(format!("output={}", output.display()));
    }
    report.detail(format!("split_raw={}", cfg.layout.split_raw));
    report.detail(format!("rename_files={}", cfg.layout.rename_files));
    if opts.dry_run {
        report.detail("dry-run: no directories created, no files copied");
    }

    let organize = OrganizeOptions {
        input_roots: opts.inputs.clone(),
        output_roots: opts.outputs.clone(),
        rules: ScanRules::from(&cfg.extensions),
        plan: PlanOptions::from(&cfg.layout),
        dry_run: opts.dry_run,
    };

    let outcome = match run_organize(&organize, &ExifMetadata) {
        Ok(outcome) => outcome,
        Err(err) => {
            audit_run(
                &mut report,
                &paths,
                "failed",
                &format!("code={} {err}", err.code()),
            );
            return Err(err.into());
        }
    };

    describe(&mut report, &outcome, opts.dry_run);
    warn_skipped(&outcome);
    audit_run(
        &mut report,
        &paths,
        if opts.dry_run { "dry-run" } else { "ok" },
        &format!(
            "assets={} copied={} skipped={}",
            outcome.assets.len(),
            outcome.execution.copied.len(),
            outcome.execution.skipped.len()
        ),
    );

    Ok(report)
}
