//! Error types for pack discovery and loading operations.

use std::path::PathBuf;
use thiserror::Error;

/// Result type alias using `ScanError`.
pub type Result<T> = std::result::Result<T, ScanError>;

/// Errors that can occur while locating, scanning, or loading packs.
///
/// Almost all of these are absorbed at the component boundary where they
/// occur: the condition is logged, recorded in the [`ScanReport`], and the
/// offending path or name is dropped while the scan continues. The single
/// exception is [`ScanError::NotYetLoaded`], which indicates a usage-order
/// violation and is returned to the caller.
///
/// [`ScanReport`]: crate::ScanReport
#[derive(Error, Debug)]
pub enum ScanError {
    /// An included path does not exist.
    #[error("path not found: {path}")]
    PathNotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// An included file is neither a pack archive nor a directory.
    #[error("not a pack archive or directory: {path}")]
    InvalidArchivePath {
        /// The rejected path.
        path: PathBuf,
    },

    /// A pack archive could not be opened or its entry stream read.
    #[error("failed to read pack {path}: {reason}")]
    ArchiveRead {
        /// Path of the unreadable pack.
        path: PathBuf,
        /// Underlying failure description.
        reason: String,
    },

    /// A discovered type name could not be resolved through the loading
    /// context.
    #[error("failed to resolve type `{name}`: {reason}")]
    TypeResolution {
        /// The fully-qualified name that failed to resolve.
        name: String,
        /// Why resolution failed (not indexed, malformed definition, ...).
        reason: String,
    },

    /// A supertype filter identifier could not be resolved.
    #[error("failed to resolve supertype `{name}`")]
    SupertypeResolution {
        /// The unresolvable supertype identifier.
        name: String,
    },

    /// The registry was requested before `build()` completed.
    #[error("registry requested before build() completed")]
    NotYetLoaded,

    /// I/O operation failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
