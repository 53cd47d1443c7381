//! The sort pipeline: scan, pair, reconcile, plan, copy.

use crate::error::SortError;
use crate::photosort::execute::{ExecutionOutcome, execute};
use crate::photosort::metadata::MetadataSource;
use crate::photosort::pairing::{Asset, pair};
use crate::photosort::plan::{PlanOptions, plan};
use crate::photosort::reconcile::{Reconciliation, reconcile};
use crate::photosort::scan::{ScanRules, scan};
use crate::photosort::target::TargetSubdir;
use std::collections::BTreeSet;
use std::path::PathBuf;

#[derive(Debug, Clone)]
pub struct OrganizeOptions {
    pub input_roots: Vec<PathBuf>,
    pub output_roots: Vec<PathBuf>,
    pub rules: ScanRules,
    pub plan: PlanOptions,
    pub dry_run: bool,
}

#[derive(Debug, Clone)]
pub struct OrganizeOutcome {
    pub jpeg_found: usize,
    pub raw_found: usize,
    pub assets: Vec<Asset>,
    pub reconciliation: Reconciliation,
    pub execution: ExecutionOutcome,
}

impl OrganizeOutcome {
    pub fn paired(&self) -> usize {
        self.assets.iter().filter(|a| a.is_paired()).count()
    }
}

pub fn run_organize(
    opts: &OrganizeOptions,
    metadata: &dyn MetadataSource,
) -> Result<OrganizeOutcome, SortError> {
    let scanned = scan(&opts.input_roots, &opts.rules)?;
    let assets = pair(&scanned.jpeg_paths, &scanned.raw_paths, metadata)?;
    let required: BTreeSet<TargetSubdir> =
        assets.iter().map(|a| a.target_subdir.clone()).collect();
    let reconciliation = reconcile(&opts.output_roots, &required, !opts.dry_run)?;
    let assets = plan(assets, &opts.output_roots, &reconciliation, &opts.plan)?;
    let execution = execute(&assets, opts.dry_run)?;

    Ok(OrganizeOutcome {
        jpeg_found: scanned.jpeg_paths.len(),
        raw_found: scanned.raw_paths.len(),
        assets,
        reconciliation,
        execution,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::photosort::config::ExtensionConfig;
    use crate::photosort::metadata::testing::FakeMetadata;
    use std::fs;
    use std::path::Path;
    use tempfile::tempdir;

    fn touch(path: &Path, body: &[u8]) {
        fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
        fs::write(path, body).expect("write");
    }

    fn options(input: &Path, outputs: Vec<PathBuf>, split: bool) -> OrganizeOptions {
        OrganizeOptions {
            input_roots: vec![input.to_path_buf()],
            output_roots: outputs,
            rules: ScanRules::from(&ExtensionConfig::default()),
            plan: PlanOptions {
                rename_files: true,
                split_dirs: split.then(|| ("JPG".to_string(), "RAW".to_string())),
            },
            dry_run: false,
        }
    }

    fn fixture(root: &Path) -> (PathBuf, FakeMetadata) {
        let input = root.join("card");
        touch(&input.join("IMG_0001.JPG"), b"one-jpeg");
        touch(&input.join("IMG_0001.RAW"), b"one-raw");
        touch(&input.join("IMG_0002.JPG"), b"two-jpeg");
        let meta = FakeMetadata::default()
            .with(input.join("IMG_0001.JPG"), "2024-03-01T10:00:00")
            .with(input.join("IMG_0002.JPG"), "2024-06-15T08:00:00");
        (input, meta)
    }

    #[test]
    fn end_to_end_pairs_creates_days_and_copies_three_files() {
        let tmp = tempdir().expect("tempdir");
        let (input, meta) = fixture(tmp.path());
        let out = tmp.path().join("library");
        fs::create_dir_all(&out).expect("mkdir");

        let outcome = run_organize(&options(&input, vec![out.clone()], false), &meta)
            .expect("organize");

        assert_eq!(outcome.jpeg_found, 2);
        assert_eq!(outcome.raw_found, 1);
        assert_eq!(outcome.paired(), 1);
        assert_eq!(outcome.execution.copied.len(), 3);
        assert!(outcome.execution.skipped.is_empty());
        assert!(
            outcome
                .reconciliation
                .created
                .contains(&out.join("2024/2024-06-15"))
        );
        assert_eq!(
            fs::read(out.join("2024/2024-03-01/2024-03-01_10-00-00-IMG_0001.RAW")).expect("raw"),
            b"one-raw"
        );
        assert!(out.join("2024/2024-03-01/2024-03-01_10-00-00-IMG_0001.JPG").is_file());
        assert!(out.join("2024/2024-06-15/2024-06-15_08-00-00-IMG_0002.JPG").is_file());
    }

    #[test]
    fn rerun_is_idempotent_and_reports_every_destination_skipped() {
        let tmp = tempdir().expect("tempdir");
        let (input, meta) = fixture(tmp.path());
        let outputs = vec![tmp.path().join("a"), tmp.path().join("b")];
        for out in &outputs {
            fs::create_dir_all(out).expect("mkdir");
        }
        let opts = options(&input, outputs, true);

        let first = run_organize(&opts, &meta).expect("first");
        let second = run_organize(&opts, &meta).expect("second");

        assert_eq!(first.execution.copied.len(), 6);
        assert!(second.execution.copied.is_empty());
        assert_eq!(second.execution.skipped.len(), 6);
        assert!(second.reconciliation.created.is_empty());
        assert!(
            tmp.path()
                .join("b/2024/2024-03-01/RAW/2024-03-01_10-00-00-IMG_0001.RAW")
                .is_file()
        );
    }

    #[test]
    fn ambiguous_output_directory_aborts_before_any_copy() {
        let tmp = tempdir().expect("tempdir");
        let (input, meta) = fixture(tmp.path());
        let out = tmp.path().join("library");
        fs::create_dir_all(out.join("2024/2024-03-01_A")).expect("mkdir");
        fs::create_dir_all(out.join("2024/2024-03-01_B")).expect("mkdir");

        let err = run_organize(&options(&input, vec![out.clone()], false), &meta)
            .expect_err("ambiguous");
        assert!(matches!(err, SortError::AmbiguousDirectory { .. }));
        assert!(!out.join("2024/2024-06-15").exists());
    }

    #[test]
    fn dry_run_leaves_output_untouched() {
        let tmp = tempdir().expect("tempdir");
        let (input, meta) = fixture(tmp.path());
        let out = tmp.path().join("library");
        fs::create_dir_all(&out).expect("mkdir");
        let mut opts = options(&input, vec![out.clone()], false);
        opts.dry_run = true;

        let outcome = run_organize(&opts, &meta).expect("dry run");
        assert_eq!(outcome.execution.copied.len(), 3);
        assert_eq!(fs::read_dir(&out).expect("read").count(), 0);
    }

    #[test]
    fn mistyped_output_root_is_rejected_and_never_created() {
        let tmp = tempdir().expect("tempdir");
        let (input, meta) = fixture(tmp.path());
        let typo = tmp.path().join("Phots");

        let err = run_organize(&options(&input, vec![typo.clone()], false), &meta)
            .expect_err("missing output");
        assert!(matches!(err, SortError::MissingOutputRoot(_)));
        assert!(!typo.exists());
    }
}
