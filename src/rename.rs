use crate::error::RenameError;
use crate::fs_atomic::{atomic_copy_replace, move_file, same_contents};
use crate::model::{CollisionPolicy, RenameDecision, RenameOptions, RunSummary};
use crate::path_norm::is_same_file;
use crate::timestamp::{lowercase_extension, new_file_name, MetadataReader};
use log::{debug, info, warn};
use std::fs;
use std::path::{Path, PathBuf};

/// Renames every path in turn, handing one status line per file to `report`.
///
/// A failing file never stops the run.
pub fn process_all<FReport>(
    paths: &[PathBuf],
    options: &RenameOptions,
    reader: &dyn MetadataReader,
    mut report: FReport,
) -> RunSummary
where
    FReport: FnMut(String),
{
    let mut summary = RunSummary::default();
    for path in paths {
        summary.processed += 1;
        match process(path, options, reader) {
            Ok(decision) => {
                match decision {
                    RenameDecision::Renamed { .. } => summary.renamed += 1,
                    RenameDecision::DryRun { .. } => summary.previewed += 1,
                    RenameDecision::NotFound | RenameDecision::AlreadyNamed { .. } => {
                        summary.skipped += 1
                    }
                }
                report(decision.to_string());
            }
            Err(error) => {
                if error.is_skip() {
                    summary.skipped += 1;
                } else {
                    summary.failed += 1;
                }
                report(error.to_string());
            }
        }
    }
    info!(
        "processed {}: {} renamed, {} previewed, {} skipped, {} failed",
        summary.processed, summary.renamed, summary.previewed, summary.skipped, summary.failed
    );
    summary
}

/// Decides what happens to `path` and applies it unless `options.dry_run`.
///
/// The checks run in a fixed order: existence, timestamp, dry-run,
/// already-named, collision, backup, move. A dry run returns before anything
/// touches the filesystem, and the move only happens after a requested
/// backup succeeded.
pub fn process(
    path: &Path,
    options: &RenameOptions,
    reader: &dyn MetadataReader,
) -> Result<RenameDecision, RenameError> {
    if !path.exists() {
        return Ok(RenameDecision::NotFound);
    }

    let new_name = new_file_name(path, reader, options.scheme)?;
    let old = path.display().to_string();
    let base_destination = sibling(path, &new_name);
    let current_name = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let already_named = current_name == new_name
        || is_sequenced_name(&current_name, &new_name, &lowercase_extension(path));

    if options.dry_run {
        // Same destination the real run would pick; nothing is created.
        let destination = if already_named {
            path.to_path_buf()
        } else {
            resolve_destination(path, &base_destination, options.collision)?
        };
        return Ok(RenameDecision::DryRun {
            old,
            new_name: destination.display().to_string(),
        });
    }

    if already_named {
        return Ok(RenameDecision::AlreadyNamed { name: old });
    }

    let destination = resolve_destination(path, &base_destination, options.collision)?;

    if options.backup {
        create_backup(path, &options.backup_dir)?;
    }

    let note = move_file(path, &destination).map_err(|reason| RenameError::Move {
        name: old.clone(),
        destination: destination.display().to_string(),
        reason,
    })?;
    if let Some(note) = note {
        debug!("{}: {}", old, note);
    }

    Ok(RenameDecision::Renamed {
        old,
        new_name: destination.display().to_string(),
        backed_up: options.backup,
    })
}

/// Copies `path` verbatim to `<backup_dir>/<file name>`, creating the
/// directory when needed.
///
/// An existing backup is kept: identical content is accepted as is (a rerun
/// after an interrupted move), different content is refused so no earlier
/// original is ever lost.
pub fn create_backup(path: &Path, backup_dir: &Path) -> Result<PathBuf, RenameError> {
    let backup_error = |reason: String| RenameError::Backup {
        name: path.display().to_string(),
        reason,
    };

    let file_name = path
        .file_name()
        .ok_or_else(|| backup_error("path has no file name".to_string()))?;
    if !backup_dir.is_dir() {
        fs::create_dir_all(backup_dir).map_err(|e| {
            backup_error(format!(
                "creating {} failed: {}",
                backup_dir.display(),
                e
            ))
        })?;
    }

    let target = backup_dir.join(file_name);
    if target.exists() {
        let identical = same_contents(path, &target).map_err(|e| {
            backup_error(format!("comparing with {} failed: {}", target.display(), e))
        })?;
        if !identical {
            return Err(backup_error(format!(
                "{} already holds a different file",
                target.display()
            )));
        }
        debug!("{} is already backed up", path.display());
        return Ok(target);
    }

    atomic_copy_replace(path, &target).map_err(backup_error)?;
    debug!("backed up {} to {}", path.display(), target.display());
    Ok(target)
}

/// `<stem>_<n><ext>` names left by the sequence collision policy.
fn is_sequenced_name(current: &str, new_name: &str, extension: &str) -> bool {
    let Some(stem) = new_name.strip_suffix(extension) else {
        return false;
    };
    current
        .strip_suffix(extension)
        .and_then(|rest| rest.strip_prefix(stem))
        .and_then(|rest| rest.strip_prefix('_'))
        .map(|digits| !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit()))
        .unwrap_or(false)
}

fn sibling(path: &Path, file_name: &str) -> PathBuf {
    path.parent().map_or_else(
        || PathBuf::from(file_name),
        |parent| parent.join(file_name),
    )
}

fn resolve_destination(
    source: &Path,
    base: &Path,
    policy: CollisionPolicy,
) -> Result<PathBuf, RenameError> {
    if !base.exists() || is_same_file(source, base) {
        return Ok(base.to_path_buf());
    }
    match policy {
        CollisionPolicy::Skip => Err(RenameError::DestinationExists {
            name: source.display().to_string(),
            destination: base.display().to_string(),
        }),
        CollisionPolicy::Overwrite => {
            warn!(
                "{} already exists and will be replaced by {}",
                base.display(),
                source.display()
            );
            Ok(base.to_path_buf())
        }
        CollisionPolicy::Sequence => Ok(uniquify_destination(base, source)),
    }
}

fn uniquify_destination(base: &Path, source: &Path) -> PathBuf {
    let stem = base
        .file_stem()
        .and_then(|stem| stem.to_str())
        .unwrap_or("file");
    let extension = base.extension().and_then(|ext| ext.to_str()).unwrap_or("");
    let mut suffix = 1usize;

    loop {
        let file_name = if extension.is_empty() {
            format!("{}_{}", stem, suffix)
        } else {
            format!("{}_{}.{}", stem, suffix, extension)
        };
        let candidate = sibling(base, &file_name);
        if !candidate.exists() || is_same_file(source, &candidate) {
            return candidate;
        }
        suffix += 1;
    }
}
