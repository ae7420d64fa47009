//! Load-time error types
//!
//! Only loading can fail. Once a level is built every per-frame operation
//! is total.

use std::path::PathBuf;

/// Errors raised while reading settings or level data
#[derive(thiserror::Error, Debug)]
pub enum LoadError {
    /// Level data file could not be read
    #[error("Failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A record in the level data is missing fields or has a bad number
    #[error("Malformed level data at line {line}: {reason}")]
    Malformed { line: usize, reason: String },

    /// The configured level catalog is unusable
    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl LoadError {
    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        LoadError::Malformed {
            line,
            reason: reason.into(),
        }
    }
}
