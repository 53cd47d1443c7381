mod support;

use predicates::prelude::*;
use std::fs;
use std::path::Path;
use support::{photosort, write_photo};
use tempfile::tempdir;

#[test]
fn keep_original_without_out_dir_exits_with_status_one() {
    let tmp = tempdir().expect("tempdir");
    let card = tmp.path().join("card");
    write_photo(&card.join("IMG_0001.JPG"), "2024:03:01 10:00:00");

    photosort(tmp.path())
        .arg("time-offset")
        .arg("-i")
        .arg(&card)
        .args(["--hours", "1", "--keep-original"])
        .assert()
        .code(1)
        .stderr(predicate::str::contains("--out-dir"));
}

#[test]
fn dry_run_reports_shifted_times_and_leaves_files_alone() {
    let tmp = tempdir().expect("tempdir");
    let card = tmp.path().join("card");
    let photo = card.join("sub/IMG_0001.JPG");
    write_photo(&photo, "2024:03:01 23:30:00");
    let before = fs::read(&photo).expect("read");

    photosort(tmp.path())
        .arg("time-offset")
        .arg("-i")
        .arg(&card)
        .args(["--hours", "1", "--minutes", "15", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("files=1"))
        .stdout(predicate::str::contains(
            "2024-03-01 23:30:00 -> 2024-03-02 00:45:00",
        ));

    assert_eq!(fs::read(&photo).expect("read"), before);
}

#[test]
fn negative_offset_is_accepted() {
    let tmp = tempdir().expect("tempdir");
    let card = tmp.path().join("card");
    write_photo(&card.join("IMG_0001.JPG"), "2024:03:01 10:00:00");

    photosort(tmp.path())
        .arg("time-offset")
        .arg("-i")
        .arg(&card)
        .args(["--hours", "-2", "--dry-run"])
        .assert()
        .success()
        .stdout(predicate::str::contains("-> 2024-03-01 08:00:00"));
}

#[test]
fn missing_out_dir_is_fatal() {
    let tmp = tempdir().expect("tempdir");
    let card = tmp.path().join("card");
    write_photo(&card.join("IMG_0001.JPG"), "2024:03:01 10:00:00");

    photosort(tmp.path())
        .arg("time-offset")
        .arg("-i")
        .arg(&card)
        .args(["--hours", "1", "-k", "-o"])
        .arg(tmp.path().join("absent"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("failed to create directory"));
}

fn capture_time_line(home: &Path, dir: &Path) -> String {
    let output = photosort(home)
        .arg("time-offset")
        .arg("-i")
        .arg(dir)
        .args(["--hours", "0", "--dry-run"])
        .assert()
        .success()
        .get_output()
        .clone();
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn in_place_shift_rewrites_the_capture_time() {
    let tmp = tempdir().expect("tempdir");
    let card = tmp.path().join("card");
    write_photo(&card.join("IMG_0001.JPG"), "2024:03:01 10:00:00");

    photosort(tmp.path())
        .arg("time-offset")
        .arg("-i")
        .arg(&card)
        .args(["--hours", "2"])
        .assert()
        .success()
        .stdout(predicate::str::contains("2024-03-01 10:00:00 -> 2024-03-01 12:00:00"));

    let after = capture_time_line(tmp.path(), &card);
    assert!(after.contains("2024-03-01 12:00:00 -> 2024-03-01 12:00:00"), "{after}");
}

#[test]
fn keep_original_writes_a_shifted_copy_and_leaves_the_original() {
    let tmp = tempdir().expect("tempdir");
    let card = tmp.path().join("card");
    let photo = card.join("sub/IMG_0001.JPG");
    write_photo(&photo, "2024:03:01 10:00:00");
    let before = fs::read(&photo).expect("read");
    let fixed = tmp.path().join("fixed");
    fs::create_dir_all(&fixed).expect("mkdir");

    photosort(tmp.path())
        .arg("time-offset")
        .arg("-i")
        .arg(&card)
        .args(["--hours", "2", "-k", "-o"])
        .arg(&fixed)
        .assert()
        .success();

    assert_eq!(fs::read(&photo).expect("read original"), before);
    assert!(fixed.join("IMG_0001.JPG").is_file());
    let copy = capture_time_line(tmp.path(), &fixed);
    assert!(copy.contains("2024-03-01 12:00:00 -> 2024-03-01 12:00:00"), "{copy}");
    let original = capture_time_line(tmp.path(), &card);
    assert!(original.contains("2024-03-01 10:00:00 -> 2024-03-01 10:00:00"), "{original}");
}

#[test]
fn keep_original_refuses_an_out_dir_that_is_the_input() {
    let tmp = tempdir().expect("tempdir");
    let card = tmp.path().join("card");
    let photo = card.join("IMG_0001.JPG");
    write_photo(&photo, "2024:03:01 10:00:00");
    let before = fs::read(&photo).expect("read");

    photosort(tmp.path())
        .arg("time-offset")
        .arg("-i")
        .arg(&card)
        .args(["--hours", "1", "-k", "-o"])
        .arg(card.join("../card"))
        .assert()
        .code(1)
        .stderr(predicate::str::contains("would overwrite the original"));

    assert_eq!(fs::read(&photo).expect("read"), before);
    let audit = fs::read_to_string(tmp.path().join("home/logs/audit.log")).expect("audit log");
    assert!(audit.contains("OVERWRITES_ORIGINAL"));
}
