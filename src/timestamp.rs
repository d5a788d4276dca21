use crate::error::RenameError;
use crate::model::{CaptureTimestamp, NamingScheme, ResolvedName, TimestampSource};
use chrono::{Datelike, NaiveDateTime, Timelike};
use exif::{In, Reader, Tag, Value};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs;
use std::io::BufReader;
use std::path::Path;

static FILE_NAME_TIMESTAMP_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{8}_[0-9]{6}").expect("failed to compile file name timestamp regex")
});

// Names this tool produced itself, in either scheme.
static CANONICAL_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"[0-9]{4}-[0-9]{2}-[0-9]{2}[_.][0-9]{2}\.[0-9]{2}\.[0-9]{2}")
        .expect("failed to compile canonical name regex")
});

/// Source of the raw `DateTimeOriginal` string.
///
/// `Ok(None)` means the field is absent, which is not an error: the resolver
/// falls back to the file name.
pub trait MetadataReader {
    fn date_time_original(&self, path: &Path) -> Result<Option<String>, RenameError>;
}

/// Reads EXIF from any container `kamadak-exif` understands (JPEG, TIFF,
/// HEIF, PNG, WebP).
#[derive(Debug, Clone, Copy, Default)]
pub struct ExifReader;

impl MetadataReader for ExifReader {
    fn date_time_original(&self, path: &Path) -> Result<Option<String>, RenameError> {
        let file = fs::File::open(path).map_err(|e| RenameError::Metadata {
            name: path.display().to_string(),
            reason: e.to_string(),
        })?;
        let mut reader = BufReader::new(file);
        let exif = match Reader::new().read_from_container(&mut reader) {
            Ok(exif) => exif,
            Err(error) => {
                debug!("no EXIF in {}: {}", path.display(), error);
                return Ok(None);
            }
        };
        let Some(field) = exif.get_field(Tag::DateTimeOriginal, In::PRIMARY) else {
            return Ok(None);
        };
        // Raw ASCII bytes; display_value() would wrap the value in quotes.
        let value = match &field.value {
            Value::Ascii(vec) if !vec.is_empty() => {
                Some(String::from_utf8_lossy(&vec[0]).into_owned())
            }
            _ => None,
        };
        Ok(value)
    }
}

/// Turns `YYYY:MM:DD HH:MM:SS` into `YYYY-MM-DD_HH.MM.SS` by plain token
/// joining: the space becomes the scheme separator, then the value is split on
/// `:` and the five tokens are joined as `t0-t1-t2.t3.t4`. The numbers are not
/// interpreted.
pub fn format_metadata_timestamp(raw: &str, scheme: NamingScheme) -> Option<String> {
    let trimmed = raw.trim_matches(|c: char| c == '\0' || c.is_whitespace());
    // Cameras without a clock write blanks or all-space values.
    if !trimmed.chars().any(|c| c.is_ascii_digit()) {
        return None;
    }
    let joined = trimmed.replace(' ', &scheme.separator().to_string());
    let parts: Vec<&str> = joined.split(':').collect();
    // Anything after the fifth token (sub-second junk some firmwares append)
    // is ignored.
    if parts.len() < 5 {
        return None;
    }
    Some(format!(
        "{}-{}-{}.{}.{}",
        parts[0], parts[1], parts[2], parts[3], parts[4]
    ))
}

/// First timestamp in `name` that is a real date and time.
///
/// Camera style `YYYYMMDD_HHMMSS` runs are tried first, then names already in
/// `YYYY-MM-DD_hh.mm.ss` or `YYYY-MM-DD.hh.mm.ss` form, so a file renamed
/// from its file name resolves to the same name again.
pub fn timestamp_from_file_name(name: &str) -> Option<CaptureTimestamp> {
    let compact = FILE_NAME_TIMESTAMP_RE
        .find_iter(name)
        .find_map(|found| NaiveDateTime::parse_from_str(found.as_str(), "%Y%m%d_%H%M%S").ok());
    let naive = compact.or_else(|| {
        CANONICAL_NAME_RE.find_iter(name).find_map(|found| {
            // Both schemes parse the same once the date/time separator is fixed.
            let mut text = found.as_str().to_string();
            text.replace_range(10..11, "_");
            NaiveDateTime::parse_from_str(&text, "%Y-%m-%d_%H.%M.%S").ok()
        })
    })?;
    Some(CaptureTimestamp {
        year: naive.year(),
        month: naive.month(),
        day: naive.day(),
        hour: naive.hour(),
        minute: naive.minute(),
        second: naive.second(),
    })
}

pub fn resolve(
    path: &Path,
    reader: &dyn MetadataReader,
    scheme: NamingScheme,
) -> Result<ResolvedName, RenameError> {
    if let Some(raw) = reader.date_time_original(path)? {
        if let Some(stem) = format_metadata_timestamp(&raw, scheme) {
            return Ok(ResolvedName {
                stem,
                source: TimestampSource::Metadata,
            });
        }
        debug!(
            "unusable DateTimeOriginal {:?} in {}",
            raw,
            path.display()
        );
    }

    let file_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    timestamp_from_file_name(&file_name)
        .map(|timestamp| ResolvedName {
            stem: timestamp.format(scheme),
            source: TimestampSource::FileName,
        })
        .ok_or_else(|| RenameError::NoTimestampFound {
            name: path.display().to_string(),
        })
}

/// Extension of `path` with its leading dot, lowercased; empty when absent.
pub fn lowercase_extension(path: &Path) -> String {
    path.extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default()
}

/// `<timestamp><.ext>` for `path`.
pub fn new_file_name(
    path: &Path,
    reader: &dyn MetadataReader,
    scheme: NamingScheme,
) -> Result<String, RenameError> {
    let resolved = resolve(path, reader, scheme)?;
    debug!(
        "{}: timestamp from {}",
        path.display(),
        resolved.source
    );
    Ok(resolved.stem + &lowercase_extension(path))
}
