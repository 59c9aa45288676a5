use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures of the settings persistence layer.
///
/// These never reach the reading controls: the session logs them and keeps going.
#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("Settings I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("Malformed settings file {path}: {source}")]
    Malformed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode settings: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("No configuration directory available")]
    NoConfigDir,
}

impl SettingsError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        SettingsError::Io {
            path: path.into(),
            source,
        }
    }
}
