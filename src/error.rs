use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    #[error("settings error: {0}")]
    Settings(String),
}

/// Per-file failure. The driver reports these and moves on to the next file.
#[derive(Debug, Error)]
pub enum RenameError {
    #[error("Can't rename {name}.")]
    NoTimestampFound { name: String },
    #[error("Can't read metadata of {name}: {reason}")]
    Metadata { name: String, reason: String },
    #[error("Can't back up {name}: {reason}")]
    Backup { name: String, reason: String },
    #[error("Can't move {name} -> {destination}: {reason}")]
    Move {
        name: String,
        destination: String,
        reason: String,
    },
    #[error("Can't rename {name}: {destination} already exists.")]
    DestinationExists { name: String, destination: String },
}

impl RenameError {
    /// Files that merely had nothing to rename to are skips, not failures.
    pub fn is_skip(&self) -> bool {
        matches!(self, Self::NoTimestampFound { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_missing_timestamps_are_skips() {
        let skip = RenameError::NoTimestampFound {
            name: "holiday.jpg".to_string(),
        };
        let failure = RenameError::Backup {
            name: "IMG_0001.JPG".to_string(),
            reason: "backup/IMG_0001.JPG already holds a different file".to_string(),
        };
        assert!(skip.is_skip());
        assert!(!failure.is_skip());
        assert_eq!(skip.to_string(), "Can't rename holiday.jpg.");
        assert_eq!(
            AppError::InvalidRequest("no files to rename".to_string()).to_string(),
            "invalid request: no files to rename"
        );
    }
}
