//! # Error Types
//!
//! Operational errors only. A malformed *field* inside a document is a lint
//! finding and lives in [`crate::diagnostics`]; the types here describe the
//! cases where a file could not be turned into a value at all.

use std::path::PathBuf;

use thiserror::Error;

/// A JSON document could not be read or decoded.
#[derive(Error, Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    #[error("{}: {source}", path.display())]
    Io {
        /// Path that was being read.
        path: PathBuf,
        /// Underlying I/O failure.
        source: std::io::Error,
    },

    /// The file was read but is not valid JSON.
    #[error("{}: {source}", path.display())]
    Parse {
        /// Path that was being decoded.
        path: PathBuf,
        /// Underlying decoder failure, including line and column.
        source: serde_json::Error,
    },
}

impl LoadError {
    /// Path of the document that failed to load.
    pub fn path(&self) -> &std::path::Path {
        match self {
            Self::Io { path, .. } | Self::Parse { path, .. } => path,
        }
    }
}

/// The lint configuration file could not be used.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("cannot read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The configuration file is not valid YAML or has unknown keys.
    #[error("invalid config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        source: serde_yaml::Error,
    },

    /// The configuration parsed but holds an unusable value.
    #[error("invalid config {}: {detail}", path.display())]
    Invalid { path: PathBuf, detail: String },
}
