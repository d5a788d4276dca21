use log::debug;
use std::fs;
use std::path::{Path, PathBuf};

pub const RENAME_ALLOWED_EXTENSIONS: &[&str] = &[
    "jpg", "jpeg", "png", "webp", "tif", "tiff", "heic", "heif", "dng", "cr2", "cr3", "nef",
    "arw", "raf", "mp4", "mov", "m4v", "avi", "mkv", "3gp", "mts", "m2ts",
];

#[derive(Debug, Clone, Default)]
pub struct CollectResult {
    pub files: Vec<PathBuf>,
    pub skipped_by_extension: usize,
}

/// Expands the command line inputs into the files to process.
///
/// Explicit paths are kept as given, in order, even when they do not exist.
/// Directories contribute their immediate files with an allowed extension;
/// subdirectories are never entered.
pub fn collect_candidates(
    inputs: &[PathBuf],
    allowed_extensions: &[String],
) -> Result<CollectResult, String> {
    let mut result = CollectResult::default();
    for input in inputs {
        if input.is_dir() {
            let (mut files, skipped) = collect_from_dir(input, allowed_extensions)?;
            result.skipped_by_extension += skipped;
            result.files.append(&mut files);
        } else {
            result.files.push(input.clone());
        }
    }
    Ok(result)
}

fn collect_from_dir(
    dir: &Path,
    allowed_extensions: &[String],
) -> Result<(Vec<PathBuf>, usize), String> {
    let mut files = Vec::new();
    let mut skipped = 0usize;
    let entries = fs::read_dir(dir)
        .map_err(|e| format!("reading directory {} failed: {}", dir.display(), e))?;
    for entry in entries {
        let entry = entry.map_err(|e| format!("reading directory entry failed: {}", e))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        if has_allowed_extension(&path, allowed_extensions) {
            files.push(path);
        } else {
            debug!("{} is not an image or video", path.display());
            skipped += 1;
        }
    }
    files.sort_by(|a, b| {
        a.to_string_lossy()
            .to_lowercase()
            .cmp(&b.to_string_lossy().to_lowercase())
    });
    Ok((files, skipped))
}

fn has_allowed_extension(path: &Path, allowed: &[String]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| allowed.iter().any(|item| item.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}
