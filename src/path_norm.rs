use std::path::{Path, PathBuf};

/// `canonicalize()` wrapper that strips the Windows `\\?\` prefix.
pub fn safe_canonicalize(path: &Path) -> std::io::Result<PathBuf> {
    let canonical = path.canonicalize()?;
    Ok(strip_verbatim(canonical))
}

#[cfg(windows)]
fn strip_verbatim(path: PathBuf) -> PathBuf {
    let s = path.to_string_lossy();
    if let Some(stripped) = s.strip_prefix(r"\\?\") {
        PathBuf::from(stripped)
    } else {
        path
    }
}

#[cfg(not(windows))]
fn strip_verbatim(path: PathBuf) -> PathBuf {
    path
}

/// True when both paths exist and name the same directory entry, e.g.
/// `A.JPG` and `a.jpg` on a case-insensitive filesystem.
pub fn is_same_file(a: &Path, b: &Path) -> bool {
    match (safe_canonicalize(a), safe_canonicalize(b)) {
        (Ok(a), Ok(b)) => a.as_os_str().eq_ignore_ascii_case(b.as_os_str()) && same_entry(&a, &b),
        _ => false,
    }
}

// Canonical paths may keep the spelling they were given on case-insensitive
// volumes, so compare the parent and the entry name case-insensitively and
// then make sure the directory really lists only one of them.
fn same_entry(a: &Path, b: &Path) -> bool {
    if a == b {
        return true;
    }
    let (Some(parent), Some(a_name), Some(b_name)) = (a.parent(), a.file_name(), b.file_name())
    else {
        return false;
    };
    let Ok(entries) = std::fs::read_dir(parent) else {
        return false;
    };
    let mut matches = 0usize;
    for entry in entries.filter_map(Result::ok) {
        let name = entry.file_name();
        if name == a_name || name == b_name {
            matches += 1;
        }
    }
    matches == 1
}
