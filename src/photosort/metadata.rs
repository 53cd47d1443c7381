//! Capture-time access for image originals.
//!
//! The rest of the pipeline only sees [`MetadataSource`]; [`ExifMetadata`]
//! is the production implementation backed by EXIF `DateTimeOriginal`.

use crate::error::SortError;
use chrono::NaiveDateTime;
use little_exif::exif_tag::ExifTag;
use little_exif::metadata::Metadata;
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

/// EXIF date-time layout, e.g. `2024:03:01 10:15:30`.
pub const EXIF_DATETIME_FORMAT: &str = "%Y:%m:%d %H:%M:%S";

pub trait MetadataSource {
    fn read_capture_time(&self, path: &Path) -> Result<NaiveDateTime, SortError>;

    fn rewrite_capture_time(
        &self,
        path: &Path,
        captured_at: NaiveDateTime,
    ) -> Result<(), SortError>;
}

pub fn parse_exif_datetime(raw: &str) -> Option<NaiveDateTime> {
    let trimmed = raw.trim_end_matches('\0').trim();
    NaiveDateTime::parse_from_str(trimmed, EXIF_DATETIME_FORMAT).ok()
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExifMetadata;

impl MetadataSource for ExifMetadata {
    fn read_capture_time(&self, path: &Path) -> Result<NaiveDateTime, SortError> {
        let file = File::open(path).map_err(|err| SortError::metadata(path, err))?;
        let mut reader = BufReader::new(file);
        let exif = exif::Reader::new()
            .read_from_container(&mut reader)
            .map_err(|err| SortError::metadata(path, err))?;
        let field = exif
            .get_field(exif::Tag::DateTimeOriginal, exif::In::PRIMARY)
            .ok_or_else(|| SortError::metadata(path, "DateTimeOriginal tag is missing"))?;
        let raw = match &field.value {
            exif::Value::Ascii(values) if !values.is_empty() => {
                String::from_utf8_lossy(&values[0]).into_owned()
            }
            _ => {
                return Err(SortError::metadata(
                    path,
                    "DateTimeOriginal tag is not an ASCII value",
                ));
            }
        };
        parse_exif_datetime(&raw).ok_or_else(|| {
            SortError::metadata(path, format!("unparsable DateTimeOriginal `{raw}`"))
        })
    }

    fn rewrite_capture_time(
        &self,
        path: &Path,
        captured_at: NaiveDateTime,
    ) -> Result<(), SortError> {
        let mut metadata =
            Metadata::new_from_path(path).map_err(|err| SortError::metadata(path, err))?;
        metadata.set_tag(ExifTag::DateTimeOriginal(
            captured_at.format(EXIF_DATETIME_FORMAT).to_string(),
        ));
        metadata
            .write_to_file(path)
            .map_err(|err| SortError::metadata(path, err))
    }
}
