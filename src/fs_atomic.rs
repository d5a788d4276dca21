use chrono::Local;
use log::{debug, warn};
use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

/// Copies `source` to `destination` through a temporary sibling so an
/// interrupted copy never leaves a truncated `destination` behind.
pub fn atomic_copy_replace(source: &Path, destination: &Path) -> Result<(), String> {
    let temp = temp_path_for(destination, "tmpcopy");
    fs::copy(source, &temp).map_err(|e| format!("copy to temporary file failed: {}", e))?;
    atomic_replace(&temp, destination).map_err(|e| {
        let _ = fs::remove_file(&temp);
        e
    })
}

/// Moves `source` to `destination` with a plain rename, falling back to
/// copy + replace + delete when the rename is refused (different volumes).
///
/// Returns a note when the fallback path was taken.
pub fn move_file(source: &Path, destination: &Path) -> Result<Option<String>, String> {
    if source == destination {
        return Ok(Some("unchanged".to_string()));
    }

    match fs::rename(source, destination) {
        Ok(()) => Ok(None),
        Err(rename_error) => {
            debug!(
                "rename {} -> {} failed ({}), copying instead",
                source.display(),
                destination.display(),
                rename_error
            );
            atomic_copy_replace(source, destination)?;
            fs::remove_file(source).map_err(|remove_error| {
                warn!(
                    "{} was copied to {} but could not be removed",
                    source.display(),
                    destination.display()
                );
                format!(
                    "rename failed: {}; removing the source after copying also failed: {}",
                    rename_error, remove_error
                )
            })?;
            Ok(Some("moved by copy + replace".to_string()))
        }
    }
}

/// Hidden sibling of `destination`, e.g. `.IMG_0001.JPG.tmpcopy-1700000000`.
/// The trailing tag keeps it out of extension based directory expansion.
fn temp_path_for(destination: &Path, tag: &str) -> PathBuf {
    let name = destination
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let suffix = Local::now().timestamp_nanos_opt().unwrap_or(0);
    destination.with_file_name(format!(".{}.{}-{}", name, tag, suffix))
}

/// Byte-for-byte comparison, reading both files in chunks.
pub fn same_contents(a: &Path, b: &Path) -> io::Result<bool> {
    if fs::metadata(a)?.len() != fs::metadata(b)?.len() {
        return Ok(false);
    }
    let mut a = BufReader::new(File::open(a)?);
    let mut b = BufReader::new(File::open(b)?);
    let mut buf_a = [0u8; 8192];
    let mut buf_b = [0u8; 8192];
    loop {
        let read = a.read(&mut buf_a)?;
        if read == 0 {
            return Ok(true);
        }
        b.read_exact(&mut buf_b[..read])?;
        if buf_a[..read] != buf_b[..read] {
            return Ok(false);
        }
    }
}

fn atomic_replace(temp: &Path, destination: &Path) -> Result<(), String> {
    #[cfg(target_os = "windows")]
    {
        if destination.exists() {
            return replace_file_windows(destination, temp);
        }
    }
    fs::rename(temp, destination).map_err(|e| format!("moving temporary file failed: {}", e))
}

#[cfg(target_os = "windows")]
fn replace_file_windows(destination: &Path, replacement: &Path) -> Result<(), String> {
    use std::ffi::OsStr;
    use std::iter;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::Storage::FileSystem::ReplaceFileW;

    fn wide(value: &OsStr) -> Vec<u16> {
        value.encode_wide().chain(iter::once(0)).collect()
    }

    let destination_w = wide(destination.as_os_str());
    let replacement_w = wide(replacement.as_os_str());
    let result = unsafe {
        ReplaceFileW(
            destination_w.as_ptr(),
            replacement_w.as_ptr(),
            std::ptr::null(),
            0,
            std::ptr::null(),
            std::ptr::null(),
        )
    };
    if result == 0 {
        return Err(format!(
            "ReplaceFileW failed: {}",
            std::io::Error::last_os_error()
        ));
    }
    Ok(())
}
