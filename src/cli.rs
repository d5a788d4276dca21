use crate::model::{AppSettings, CollisionPolicy, NamingScheme, RenameOptions};
use clap::{ArgAction, Parser, ValueEnum};
use std::ffi::OsStr;
use std::path::PathBuf;

/// Bare words accepted among the paths, as in `photo-renamer *.jpg dry-run`.
pub const DRY_RUN_KEYWORD: &str = "dry-run";
pub const BACKUP_KEYWORD: &str = "backup";

#[derive(Debug, Parser)]
#[command(name = "photo-renamer")]
#[command(version)]
#[command(about = "Rename photos and videos to YYYY-MM-DD_hh.mm.ss from their capture time")]
#[command(long_about = "Rename photos and videos to YYYY-MM-DD_hh.mm.ss<ext> using the EXIF \
DateTimeOriginal field, or a YYYYMMDD_HHMMSS run in the file name when there is none.

The words `dry-run` and `backup` may be given anywhere among the paths and act like \
--dry-run and --backup. Directories are expanded to the images and videos directly inside them.")]
pub struct Cli {
    /// Files or directories to rename
    pub paths: Vec<PathBuf>,

    /// Print what would be renamed without touching any file
    #[arg(long)]
    pub dry_run: bool,

    /// Copy each file into the backup directory before renaming it
    #[arg(long)]
    pub backup: bool,

    /// Backup directory (default: ./backup)
    #[arg(long, value_name = "DIR")]
    pub backup_dir: Option<PathBuf>,

    /// Naming scheme
    #[arg(long, value_enum)]
    pub scheme: Option<SchemeArg>,

    /// What to do when the new name is already taken by another file
    #[arg(long, value_enum)]
    pub collision: Option<CollisionArg>,

    /// JSON settings file providing defaults for the options above
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,

    /// Increase verbosity (-v=INFO, -vv=DEBUG, -vvv=TRACE)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemeArg {
    /// YYYY-MM-DD_hh.mm.ss
    Current,
    /// YYYY-MM-DD.hh.mm.ss
    Legacy,
}

impl From<SchemeArg> for NamingScheme {
    fn from(value: SchemeArg) -> Self {
        match value {
            SchemeArg::Current => NamingScheme::Current,
            SchemeArg::Legacy => NamingScheme::Legacy,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum CollisionArg {
    /// Leave the file alone and report it
    Skip,
    /// Replace the existing file
    Overwrite,
    /// Append _1, _2, ... to the new name
    Sequence,
}

impl From<CollisionArg> for CollisionPolicy {
    fn from(value: CollisionArg) -> Self {
        match value {
            CollisionArg::Skip => CollisionPolicy::Skip,
            CollisionArg::Overwrite => CollisionPolicy::Overwrite,
            CollisionArg::Sequence => CollisionPolicy::Sequence,
        }
    }
}

/// Everything a run needs, with keywords stripped from the paths.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub inputs: Vec<PathBuf>,
    pub options: RenameOptions,
    pub extensions: Vec<String>,
}

impl Cli {
    /// Merges the flags over `settings`. Flags win.
    pub fn into_invocation(self, settings: AppSettings) -> Invocation {
        let is_keyword = |path: &PathBuf, keyword: &str| path.as_os_str() == OsStr::new(keyword);
        let dry_run = self.dry_run || self.paths.iter().any(|p| is_keyword(p, DRY_RUN_KEYWORD));
        let backup = self.backup || self.paths.iter().any(|p| is_keyword(p, BACKUP_KEYWORD));
        let inputs = self
            .paths
            .into_iter()
            .filter(|p| !is_keyword(p, DRY_RUN_KEYWORD) && !is_keyword(p, BACKUP_KEYWORD))
            .collect();

        Invocation {
            inputs,
            options: RenameOptions {
                dry_run,
                backup,
                backup_dir: self
                    .backup_dir
                    .unwrap_or_else(|| PathBuf::from(settings.backup_dir.trim())),
                scheme: self
                    .scheme
                    .map(NamingScheme::from)
                    .unwrap_or(settings.naming_scheme),
                collision: self
                    .collision
                    .map(CollisionPolicy::from)
                    .unwrap_or(settings.collision_policy),
            },
            extensions: settings.extensions,
        }
    }
}
