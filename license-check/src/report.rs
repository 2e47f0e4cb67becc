//! Check report types.

use std::path::PathBuf;

use serde::Serialize;

use crate::check::{HeaderEvent, HeaderStatus, LicenseCheck};
use crate::error::{Error, ScanError};
use crate::file::FileRecord;

/// Why a checked file failed.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub enum FailureKind {
    /// The header is missing and blocking mode is on.
    MissingHeader,
    /// The file's contents could not be read during inspection.
    ReadError,
}

/// A file the check raised an error for.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[non_exhaustive]
pub struct FileFailure {
    pub file: PathBuf,
    pub kind: FailureKind,
    /// The error message as raised.
    pub message: String,
}

impl FileFailure {
    fn from_error(error: &Error) -> Self {
        let kind = match error {
            Error::MissingHeader(_) => FailureKind::MissingHeader,
            Error::Read(_) => FailureKind::ReadError,
        };
        Self {
            file: error.path().to_path_buf(),
            kind,
            message: error.to_string(),
        }
    }

    /// Format the failure for human-readable output.
    #[must_use]
    pub fn format_human_readable(&self) -> String {
        match self.kind {
            FailureKind::MissingHeader => self.message.clone(),
            FailureKind::ReadError => {
                format!("{}: [read error] {}", self.file.display(), self.message)
            }
        }
    }
}

/// Result of running the check over a whole source.
///
/// CI pipelines must check both `failures` and `scan_errors`: a non-empty
/// `scan_errors` means some files never reached the check.
#[derive(Debug, Clone, Default, Serialize)]
#[non_exhaustive]
pub struct CheckReport {
    /// Number of files whose contents were inspected.
    pub checked_files: usize,
    /// Number of files passed downstream.
    pub forwarded_files: usize,
    /// Inspected files containing the header.
    pub with_header: usize,
    /// Inspected files lacking the header (blocking or not).
    pub without_header: Vec<PathBuf>,
    /// Whether no failure and no scan error occurred.
    pub ok: bool,
    /// Header events, in file order. Empty unless logging is enabled.
    pub events: Vec<HeaderEvent>,
    /// Files the check raised an error for.
    pub failures: Vec<FileFailure>,
    /// Files that could not be handed to the check.
    pub scan_errors: Vec<ScanError>,
}

impl CheckReport {
    /// Number of failures raised by the check.
    #[must_use]
    pub fn failures_count(&self) -> usize {
        self.failures.len()
    }

    /// Recompute `ok` from the collected failures and scan errors.
    pub fn settle(&mut self) {
        self.ok = self.failures.is_empty() && self.scan_errors.is_empty();
    }
}

/// Drive `check` over `files` to completion, dropping forwarded records.
///
/// This is the terminal consumer used when nothing sits downstream of the
/// check (e.g. the CLI). Hosts that need the records use `LicenseCheck::stream`.
#[must_use]
pub fn run_pipeline<I>(check: &LicenseCheck, files: I) -> CheckReport
where
    I: IntoIterator<Item = FileRecord>,
{
    let mut report = CheckReport::default();

    for file in files {
        let path = file.path.clone();
        let outcome = check.check(file);

        match outcome.status {
            Some(HeaderStatus::Present) => {
                report.checked_files += 1;
                report.with_header += 1;
            }
            Some(HeaderStatus::Absent) => {
                report.checked_files += 1;
                report.without_header.push(path);
            }
            None => {}
        }

        report.events.extend(outcome.event);
        match outcome.forward {
            Ok(_) => report.forwarded_files += 1,
            Err(e) => report.failures.push(FileFailure::from_error(&e)),
        }
    }

    report.settle();
    report
}
