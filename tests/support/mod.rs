#![allow(dead_code)]

use assert_cmd::Command;
use std::fs;
use std::path::Path;

/// Smallest JPEG kamadak-exif accepts: SOI, an Exif APP1 segment carrying
/// only `DateTimeOriginal`, EOI. `captured_at` uses the EXIF layout
/// `YYYY:MM:DD HH:MM:SS`.
pub fn exif_jpeg(captured_at: &str) -> Vec<u8> {
    let mut datetime = captured_at.as_bytes().to_vec();
    datetime.push(0);

    let mut tiff = Vec::new();
    tiff.extend_from_slice(b"II");
    tiff.extend_from_slice(&42u16.to_le_bytes());
    tiff.extend_from_slice(&8u32.to_le_bytes());
    // IFD0 @8: ExifIFDPointer -> 26
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x8769u16.to_le_bytes());
    tiff.extend_from_slice(&4u16.to_le_bytes());
    tiff.extend_from_slice(&1u32.to_le_bytes());
    tiff.extend_from_slice(&26u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    // Exif IFD @26: DateTimeOriginal (ASCII) stored @44
    tiff.extend_from_slice(&1u16.to_le_bytes());
    tiff.extend_from_slice(&0x9003u16.to_le_bytes());
    tiff.extend_from_slice(&2u16.to_le_bytes());
    tiff.extend_from_slice(&(datetime.len() as u32).to_le_bytes());
    tiff.extend_from_slice(&44u32.to_le_bytes());
    tiff.extend_from_slice(&0u32.to_le_bytes());
    tiff.extend_from_slice(&datetime);

    let mut app1 = b"Exif\0\0".to_vec();
    app1.extend_from_slice(&tiff);

    let mut jpeg = vec![0xFF, 0xD8, 0xFF, 0xE1];
    jpeg.extend_from_slice(&((app1.len() + 2) as u16).to_be_bytes());
    jpeg.extend_from_slice(&app1);
    jpeg.extend_from_slice(&[0xFF, 0xD9]);
    jpeg
}

pub fn write_photo(path: &Path, captured_at: &str) {
    fs::create_dir_all(path.parent().expect("parent")).expect("mkdir");
    fs::write(path, exif_jpeg(captured_at)).expect("write photo");
}

/// The binary, isolated from the caller's home, config and `.env`.
pub fn photosort(home: &Path) -> Command {
    let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("photosort");
    cmd.current_dir(home)
        .env("PHOTOSORT_HOME", home.join("home"))
        .env("PHOTOSORT_CONFIG_PATH", home.join("home/photosort.toml"))
        .env_remove("PHOTOSORT_LOGS_DIR")
        .env_remove("PHOTOSORT_SPLIT_RAW")
        .env_remove("PHOTOSORT_RENAME_FILES")
        .env_remove("PHOTOSORT_JPG_DIR")
        .env_remove("PHOTOSORT_RAW_DIR")
        .env_remove("PHOTOSORT_JPEG_EXTENSIONS")
        .env_remove("PHOTOSORT_RAW_EXTENSIONS");
    cmd
}
