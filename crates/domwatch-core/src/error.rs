//! Error types for the domwatch stores
//!
//! Every store operation that touches the disk reports failures through
//! [`Error`]. A missing backing file is never an error: it is the first-run
//! path and is handled by synthesizing a default document.

use std::path::{Path, PathBuf};

use thiserror::Error;

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for the domwatch stores
#[derive(Error, Debug)]
pub enum Error {
    /// Reading, creating, writing or renaming a backing file failed
    #[error("I/O error on {}: {source}", .path.display())]
    Io {
        /// File the operation targeted
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },

    /// A backing file exists but its contents do not parse
    #[error("Corrupt document {}: {source}", .path.display())]
    Corrupt {
        /// File that failed to parse
        path: PathBuf,
        /// Underlying YAML error
        #[source]
        source: serde_yaml::Error,
    },

    /// An in-memory value could not be rendered as YAML
    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_yaml::Error),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

impl Error {
    /// Create an I/O error bound to a path
    pub fn io(path: impl AsRef<Path>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a corrupt-document error bound to a path
    pub fn corrupt(path: impl AsRef<Path>, source: serde_yaml::Error) -> Self {
        Self::Corrupt {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Create an invalid input error
    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }

    /// True when the error came from unparseable file contents
    pub fn is_corrupt(&self) -> bool {
        matches!(self, Self::Corrupt { .. })
    }
}

