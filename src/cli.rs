use anyhow::{Result, bail};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use crate::commands::sort::{self, SortOptions};
use crate::commands::time_offset::{self, TimeOffsetOptions};
use crate::commands::{CommandReport, status};

#[derive(Debug, Parser)]
#[command(
    name = "photosort",
    version,
    about = "File JPEG and RAW captures into dated folders by EXIF capture time"
)]
struct Cli {
    /// Print the command report as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Copy originals into `<output>/<year>/<YYYY-MM-DD>[_suffix]/`.
    Sort(SortArgs),
    /// Shift the capture time of every original by a fixed offset.
    TimeOffset(TimeOffsetArgs),
    /// Show resolved paths and the effective configuration.
    Status,
}

#[derive(Debug, Args)]
struct SortArgs {
    /// Input directory (repeatable).
    #[arg(long = "input", short = 'i', required = true, value_name = "DIR")]
    inputs: Vec<PathBuf>,
    /// Output directory (repeatable); every asset is copied into each one.
    #[arg(long = "output", short = 'o', required = true, value_name = "DIR")]
    outputs: Vec<PathBuf>,
    /// File JPEGs and RAWs into separate subdirectories of each day.
    #[arg(long, short = 's', overrides_with = "no_split_raw")]
    split_raw: bool,
    #[arg(long, short = 'n', overrides_with = "split_raw")]
    no_split_raw: bool,
    /// Subdirectory for JPEGs when splitting.
    #[arg(long, value_name = "NAME")]
    jpg_dir: Option<String>,
    /// Subdirectory for RAWs when splitting.
    #[arg(long, value_name = "NAME")]
    raw_dir: Option<String>,
    /// Prefix destination names with the capture time.
    #[arg(long, overrides_with = "no_rename_files")]
    rename_files: bool,
    #[arg(long, overrides_with = "rename_files")]
    no_rename_files: bool,
    /// Plan and report without creating or copying anything.
    #[arg(long)]
    dry_run: bool,
}

#[derive(Debug, Args)]
struct TimeOffsetArgs {
    /// Input directory (repeatable).
    #[arg(long = "input", short = 'i', required = true, value_name = "DIR")]
    inputs: Vec<PathBuf>,
    #[arg(long, allow_negative_numbers = true)]
    hours: i64,
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    minutes: i64,
    /// Rewrite the originals (default).
    #[arg(long, short = 'p', overrides_with = "keep_original")]
    in_place: bool,
    /// Leave originals alone and write shifted copies to --out-dir.
    #[arg(long, short = 'k', overrides_with = "in_place")]
    keep_original: bool,
    #[arg(long, short = 'o', value_name = "DIR")]
    out_dir: Option<PathBuf>,
    #[arg(long)]
    dry_run: bool,
}

fn flag_pair(on: bool, off: bool) -> Option<bool> {
    match (on, off) {
        (true, _) => Some(true),
        (_, true) => Some(false),
        _ => None,
    }
}

impl From<SortArgs> for SortOptions {
    fn from(args: SortArgs) -> Self {
        Self {
            inputs: args.inputs,
            outputs: args.outputs,
            split_raw: flag_pair(args.split_raw, args.no_split_raw),
            jpg_dir: args.jpg_dir,
            raw_dir: args.raw_dir,
            rename_files: flag_pair(args.rename_files, args.no_rename_files),
            dry_run: args.dry_run,
        }
    }
}

impl From<TimeOffsetArgs> for TimeOffsetOptions {
    fn from(args: TimeOffsetArgs) -> Self {
        Self {
            inputs: args.inputs,
            hours: args.hours,
            minutes: args.minutes,
            keep_original: flag_pair(args.keep_original, args.in_place).unwrap_or(false),
            out_dir: args.out_dir,
            dry_run: args.dry_run,
        }
    }
}

fn render_text(report: &CommandReport) -> String {
    let mut out = format!(
        "{}: {}\n",
        report.command,
        if report.ok { "ok" } else { "issues" }
    );
    for detail in &report.details {
        out.push_str(&format!("  {detail}\n"));
    }
    for issue in &report.issues {
        out.push_str(&format!("  issue: {issue}\n"));
    }
    out
}

fn print_report(report: &CommandReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
    } else {
        print!("{}", render_text(report));
    }
    Ok(())
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();
    let report = match cli.command {
        Command::Sort(args) => sort::run(&args.into())?,
        Command::TimeOffset(args) => time_offset::run(&args.into())?,
        Command::Status => status::run()?,
    };

    print_report(&report, cli.json)?;
    if !report.ok {
        bail!("{} finished with {} issue(s)", report.command, report.issues.len());
    }
    Ok(())
}
