//! # license-check
//!
//! Build-pipeline filter that checks source files for a required license header.
//!
//! The crate separates the **check** (input-agnostic: any iterator of
//! `FileRecord`s) from **sources** (starting with filesystem scanning).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use license_check::{check_fs, FsSourceConfig, LicenseCheckConfig};
//!
//! let mut config = LicenseCheckConfig::new("license-header.txt");
//! config.blocking = true;
//!
//! let mut fs_config = FsSourceConfig::default();
//! fs_config.patterns = vec!["src/**/*.rs".to_owned()];
//!
//! let report = check_fs(&config, &fs_config).unwrap();
//! println!("Files checked: {}", report.checked_files);
//! println!("Failures: {}", report.failures_count());
//! println!("OK: {}", report.ok);
//! ```
//!
//! ## Streaming
//!
//! ```rust,no_run
//! use std::io::Cursor;
//! use license_check::{FileRecord, LicenseCheck, LicenseCheckConfig, StreamEvent};
//!
//! let check = LicenseCheck::new(&LicenseCheckConfig::new("license-header.txt")).unwrap();
//! let files = vec![FileRecord::stream("a.js", Cursor::new(b"/* LICENSE */".to_vec()))];
//! for event in check.stream(files) {
//!     match event {
//!         StreamEvent::Log(e) => println!("{}: {}", e.path.display(), e.msg),
//!         StreamEvent::Data(file) => assert!(file.is_stream()),
//!         StreamEvent::Error(e) => eprintln!("{e}"),
//!     }
//! }
//! ```

mod check;
mod config;
mod error;
mod file;
mod header;
pub mod output;
mod report;
pub mod source;

pub use check::{
    CheckOutcome, CheckStream, HEADER_NOT_PRESENT, HEADER_PRESENT, HeaderEvent, HeaderStatus,
    LicenseCheck, StreamEvent,
};
pub use config::{ContentMode, FsSourceConfig, LicenseCheckConfig};
pub use error::{
    ConfigurationError, Error, MissingHeaderError, ReadError, ScanError, ScanErrorKind,
};
pub use file::{Contents, FileRecord};
pub use header::{contains_header, load_header};
pub use report::{CheckReport, FailureKind, FileFailure, run_pipeline};

use source::fs::{find_files, is_glob_pattern, open_files};

/// Check files on disk for the license header.
///
/// This is the primary public API. The header template is loaded before any
/// file is discovered or read.
///
/// # Arguments
///
/// * `config` - Header template path and the `blocking` / `log` flags
/// * `fs_config` - Filesystem source options (patterns, exclude, mode, limits)
///
/// # Errors
///
/// Returns an error if the header template cannot be loaded, if
/// `fs_config.patterns` is empty, or if a non-glob pattern names a path that
/// does not exist. A glob matching nothing is not an error.
/// Per-file failures and unreadable files are reported in the `CheckReport`.
pub fn check_fs(
    config: &LicenseCheckConfig,
    fs_config: &FsSourceConfig,
) -> anyhow::Result<CheckReport> {
    let check = LicenseCheck::new(config)?;

    if fs_config.patterns.is_empty() {
        anyhow::bail!("No paths provided for checking");
    }

    for pattern in &fs_config.patterns {
        if !is_glob_pattern(pattern) && !std::path::Path::new(pattern).exists() {
            anyhow::bail!("Path does not exist: {pattern}");
        }
    }

    let (files, mut scan_errors) = find_files(fs_config);

    let mut open_errors = Vec::new();
    let records = open_files(files, fs_config.mode, fs_config.max_file_size)
        .filter_map(|opened| opened.map_err(|e| open_errors.push(e)).ok());
    let mut report = run_pipeline(&check, records);

    scan_errors.append(&mut open_errors);
    report.scan_errors = scan_errors;
    report.settle();
    Ok(report)
}
