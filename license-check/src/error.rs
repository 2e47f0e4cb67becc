//! Error types for license header checking.

use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use thiserror::Error;

/// The header template could not be loaded. Fatal: no file is checked.
#[derive(Debug, Error)]
#[error("The license header file doesn't exist {}", path.display())]
pub struct ConfigurationError {
    /// The configured header template path, as given.
    pub path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    pub source: io::Error,
}

/// A file lacks the license header while blocking mode is on.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("The following file doesn't contain the license header: {}", path.display())]
pub struct MissingHeaderError {
    /// The offending file.
    pub path: PathBuf,
}

/// The contents of a streamed file could not be read during inspection.
#[derive(Debug, Error)]
#[error("Failed to read the contents of {}: {source}", path.display())]
pub struct ReadError {
    /// The file whose stream failed.
    pub path: PathBuf,
    /// Underlying I/O failure.
    #[source]
    pub source: io::Error,
}

/// An error raised for a single checked file.
///
/// Construction failures are a separate `ConfigurationError`: they happen
/// once, before any file exists to blame.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    #[error(transparent)]
    MissingHeader(#[from] MissingHeaderError),
    #[error(transparent)]
    Read(#[from] ReadError),
}

impl Error {
    /// The file the error was raised for.
    #[must_use]
    pub fn path(&self) -> &Path {
        match self {
            Self::MissingHeader(e) => &e.path,
            Self::Read(e) => &e.path,
        }
    }
}

/// The kind of scan-level failure that prevented a file from reaching the check.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum ScanErrorKind {
    /// An I/O error occurred while opening or reading the file.
    IoError,
    /// The file exceeded the configured maximum size limit.
    FileTooLarge,
    /// The resolved path is outside the directory being walked (symlink escape).
    OutsideRoot,
    /// A directory traversal or glob expansion error.
    WalkError,
    /// A source or exclude glob pattern could not be parsed.
    InvalidPattern,
}

/// A file that could not be handed to the check at all.
///
/// Distinct from a check `Error`: a `ScanError` means the file was never
/// inspected, so CI must treat these as failures.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct ScanError {
    /// The file path (or pattern) that could not be scanned.
    pub file: PathBuf,
    /// The kind of failure.
    pub kind: ScanErrorKind,
    /// Human-readable description of the failure.
    pub message: String,
}

impl ScanError {
    /// Format the error for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        format!("{}: [scan error] {}", self.file.display(), self.message)
    }
}
