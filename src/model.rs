use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

pub const DEFAULT_BACKUP_DIR: &str = "backup";

/// Capture time as read from a file name. No calendar validation happens here;
/// whatever produced the fields is trusted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CaptureTimestamp {
    pub year: i32,
    pub month: u32,
    pub day: u32,
    pub hour: u32,
    pub minute: u32,
    pub second: u32,
}

impl CaptureTimestamp {
    /// `YYYY-MM-DD_hh.mm.ss`
    pub fn current(&self) -> String {
        self.with_separator('_')
    }

    /// `YYYY-MM-DD.hh.mm.ss`, the naming used before the underscore form.
    pub fn legacy(&self) -> String {
        self.with_separator('.')
    }

    pub fn format(&self, scheme: NamingScheme) -> String {
        self.with_separator(scheme.separator())
    }

    fn with_separator(&self, separator: char) -> String {
        format!(
            "{:04}-{:02}-{:02}{}{:02}.{:02}.{:02}",
            self.year, self.month, self.day, separator, self.hour, self.minute, self.second
        )
    }
}

impl fmt::Display for CaptureTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.current())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum NamingScheme {
    #[default]
    Current,
    Legacy,
}

impl NamingScheme {
    /// Character placed between the date and the time.
    pub fn separator(self) -> char {
        match self {
            Self::Current => '_',
            Self::Legacy => '.',
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimestampSource {
    Metadata,
    FileName,
}

impl fmt::Display for TimestampSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Metadata => f.write_str("EXIF DateTimeOriginal"),
            Self::FileName => f.write_str("file name"),
        }
    }
}

/// New base name (without extension) and where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedName {
    pub stem: String,
    pub source: TimestampSource,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CollisionPolicy {
    Overwrite,
    Sequence,
    #[default]
    Skip,
}

/// Outcome of processing a single file. Never stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenameDecision {
    NotFound,
    AlreadyNamed { name: String },
    DryRun { old: String, new_name: String },
    Renamed {
        old: String,
        new_name: String,
        backed_up: bool,
    },
}

impl fmt::Display for RenameDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => f.write_str("File not found"),
            Self::AlreadyNamed { name } => write!(f, "{} is already renamed.", name),
            Self::DryRun { old, new_name } => write!(f, "dry-run: {} -> {}", old, new_name),
            Self::Renamed { old, new_name, .. } => write!(f, "{} -> {}", old, new_name),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameOptions {
    pub dry_run: bool,
    pub backup: bool,
    pub backup_dir: PathBuf,
    pub scheme: NamingScheme,
    pub collision: CollisionPolicy,
}

impl Default for RenameOptions {
    fn default() -> Self {
        Self {
            dry_run: false,
            backup: false,
            backup_dir: PathBuf::from(DEFAULT_BACKUP_DIR),
            scheme: NamingScheme::default(),
            collision: CollisionPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub processed: usize,
    pub renamed: usize,
    pub previewed: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Optional on-disk defaults, overridden by command line flags.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AppSettings {
    pub backup_dir: String,
    pub naming_scheme: NamingScheme,
    pub collision_policy: CollisionPolicy,
    pub extensions: Vec<String>,
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            backup_dir: DEFAULT_BACKUP_DIR.to_string(),
            naming_scheme: NamingScheme::default(),
            collision_policy: CollisionPolicy::default(),
            extensions: crate::file_collect::RENAME_ALLOWED_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timestamp_formats_both_schemes() {
        let ts = CaptureTimestamp {
            year: 2017,
            month: 2,
            day: 4,
            hour: 12,
            minute: 34,
            second: 56,
        };
        assert_eq!(ts.current(), "2017-02-04_12.34.56");
        assert_eq!(ts.legacy(), "2017-02-04.12.34.56");
        assert_eq!(ts.to_string(), ts.format(NamingScheme::Current));
    }

    #[test]
    fn decisions_render_status_lines() {
        assert_eq!(RenameDecision::NotFound.to_string(), "File not found");
        assert_eq!(
            RenameDecision::AlreadyNamed {
                name: "2019-08-15_09.00.00.jpg".to_string()
            }
            .to_string(),
            "2019-08-15_09.00.00.jpg is already renamed."
        );
        assert_eq!(
            RenameDecision::DryRun {
                old: "IMG_0001.JPG".to_string(),
                new_name: "2019-08-15_09.00.00.jpg".to_string(),
            }
            .to_string(),
            "dry-run: IMG_0001.JPG -> 2019-08-15_09.00.00.jpg"
        );
    }

    #[test]
    fn settings_fill_missing_keys_with_defaults() {
        let settings: AppSettings =
            serde_json::from_str(r#"{ "collisionPolicy": "sequence" }"#).unwrap();
        assert_eq!(settings.collision_policy, CollisionPolicy::Sequence);
        assert_eq!(settings.backup_dir, DEFAULT_BACKUP_DIR);
        assert_eq!(settings.naming_scheme, NamingScheme::Current);
        assert!(settings.extensions.iter().any(|ext| ext == "jpg"));
    }
}
