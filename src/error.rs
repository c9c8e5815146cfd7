//! Error types for modpack-dl
//!
//! Only *fatal* conditions are represented here, the failures that abort the
//! whole run (manifest problems, filesystem problems, network-level problems
//! during a step). The recoverable per-item "mod not found" case is not an
//! error: it is carried as an [`Outcome::Failure`](crate::types::Outcome) and
//! never interrupts the download sequence.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias for modpack-dl operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for modpack-dl
#[derive(Debug, Error)]
pub enum Error {
    /// Manifest could not be read or parsed (aborts before any download)
    #[error("manifest error ({}): {message}", path.display())]
    Manifest {
        /// Path of the manifest file that failed to load
        path: PathBuf,
        /// Human-readable description of the read or parse failure
        message: String,
    },

    /// I/O error (destination directory, artifact copy, terminal write)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Network error while resolving or fetching an artifact
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Serialization error
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The event loop lost one of its event sources
    #[error("event loop error: {0}")]
    EventLoop(String),
}
