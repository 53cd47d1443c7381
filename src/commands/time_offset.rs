use anyhow::{Result, anyhow, bail};
use chrono::TimeDelta;
use std::path::PathBuf;

use crate::commands::{CommandReport, audit_run};
use crate::error::SortError;
use crate::photosort::config::load_config;
use crate::photosort::metadata::ExifMetadata;
use crate::photosort::offset::{
    OffsetChange, OffsetMode, apply_offset, collect_files, ensure_out_dir, offset_from,
    plan_offsets,
};
use crate::photosort::paths::{PhotosortPaths, resolve_paths};
use crate::photosort::scan::ExtensionSet;

#[derive(Debug, Clone, Default)]
pub struct TimeOffsetOptions {
    pub inputs: Vec<PathBuf>,
    pub hours: i64,
    pub minutes: i64,
    pub keep_original: bool,
    pub out_dir: Option<PathBuf>,
    pub dry_run: bool,
}

fn resolve_mode(opts: &TimeOffsetOptions) -> Result<OffsetMode> {
    if !opts.keep_original {
        return Ok(OffsetMode::InPlace);
    }
    let Some(out_dir) = &opts.out_dir else {
        bail!("--keep-original requires --out-dir: the output directory isn't set");
    };
    ensure_out_dir(out_dir)?;
    Ok(OffsetMode::KeepOriginal {
        out_dir: out_dir.clone(),
    })
}

fn describe_change(change: &OffsetChange) -> String {
    if change.in_place() {
        format!(
            "{}: {} -> {}",
            change.source.display(),
            change.before,
            change.after
        )
    } else {
        format!(
            "{}: {} -> {} [{}]",
            change.source.display(),
            change.before,
            change.after,
            change.destination.display()
        )
    }
}

fn shift_all(
    opts: &TimeOffsetOptions,
    mode: &OffsetMode,
    delta: TimeDelta,
    extensions: &ExtensionSet,
    report: &mut CommandReport,
) -> Result<usize, SortError> {
    let metadata = ExifMetadata;
    let files = collect_files(&opts.inputs, extensions)?;
    let changes = plan_offsets(&files, delta, mode, &metadata)?;
    report.detail(format!("files={}", changes.len()));
    for change in &changes {
        if !opts.dry_run {
            apply_offset(change, &metadata)?;
        }
        report.detail(describe_change(change));
    }
    Ok(changes.len())
}

fn prepare(
    opts: &TimeOffsetOptions,
    paths: &PhotosortPaths,
) -> Result<(OffsetMode, TimeDelta, ExtensionSet)> {
    let mode = resolve_mode(opts)?;
    let delta = offset_from(opts.hours, opts.minutes).ok_or_else(|| {
        anyhow!(
            "time offset {}h {}min is out of range",
            opts.hours,
            opts.minutes
        )
    })?;
    let cfg = load_config(paths)?;
    let extensions =
        ExtensionSet::new(&cfg.extensions.jpeg).union(&ExtensionSet::new(&cfg.extensions.raw));
    Ok((mode, delta, extensions))
}

pub fn run(opts: &TimeOffsetOptions) -> Result<CommandReport> {
    let paths = resolve_paths()?;
    let mut report = CommandReport::new("time-offset");
    let (mode, delta, extensions) = match prepare(opts, &paths) {
        Ok(prepared) => prepared,
        Err(err) => {
            audit_run(&mut report, &paths, "failed", &format!("code=OPTIONS {err:#}"));
            return Err(err);
        }
    };

    report.detail(format!("offset=({}h):({}min)", opts.hours, opts.minutes));
    match &mode {
        OffsetMode::InPlace => report.detail("mode=in-place"),
        OffsetMode::KeepOriginal { out_dir } => {
            report.detail(format!("mode=keep-original out_dir={}", out_dir.display()))
        }
    }

    let result = shift_all(opts, &mode, delta, &extensions, &mut report);
    match result {
        Ok(count) => {
            let status = if opts.dry_run { "dry-run" } else { "ok" };
            audit_run(&mut report, &paths, status, &format!("files={count} offset={delta}"));
            Ok(report)
        }
        Err(err) => {
            audit_run(
                &mut report,
                &paths,
                "failed",
                &format!("code={} {err}", err.code()),
            );
            Err(err.into())
        }
    }
}
