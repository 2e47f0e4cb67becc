//! Filesystem source.
//!
//! Expands file, directory and glob patterns into file records for the check.
//! Properties enforced here:
//! - Symlinks are not followed by default (`follow_links: false`)
//! - Walked entries must resolve inside the directory being walked
//! - Device files, pipes, and sockets are skipped
//! - Maximum directory depth is enforced to prevent infinite recursion
//! - Buffered reads are bounded by `max_file_size`

use std::io::Read;
use std::path::{Path, PathBuf};

use glob::Pattern;
use walkdir::WalkDir;

use crate::config::{ContentMode, FsSourceConfig};
use crate::error::{ScanError, ScanErrorKind};
use crate::file::FileRecord;

/// Directories to skip while walking.
pub const SKIP_DIRS: &[&str] = &["target", "node_modules", ".git"];

/// Whether `pattern` contains glob metacharacters.
#[must_use]
pub fn is_glob_pattern(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

/// Check if a path matches any of the exclude patterns
fn matches_exclude(path: &Path, exclude_patterns: &[Pattern]) -> bool {
    let path_str = path.to_string_lossy();
    exclude_patterns.iter().any(|pattern| {
        pattern.matches(&path_str)
            || path
                .file_name()
                .is_some_and(|name| pattern.matches(&name.to_string_lossy()))
    })
}

/// Returns `true` if the entry should be **included** (i.e., is NOT a skip dir).
fn is_not_skip_dir(entry: &walkdir::DirEntry) -> bool {
    if entry.depth() > 0
        && entry.file_type().is_dir()
        && let Some(name) = entry.file_name().to_str()
    {
        return !SKIP_DIRS.contains(&name);
    }
    true
}

/// Find all files matched by `config.patterns`.
///
/// Returns `(files, scan_errors)`:
/// - `files`: sorted, de-duplicated paths that passed all filters.
/// - `scan_errors`: invalid patterns, walk errors and boundary violations.
///
/// A glob matching nothing contributes no files and no error.
#[must_use]
pub fn find_files(config: &FsSourceConfig) -> (Vec<PathBuf>, Vec<ScanError>) {
    let mut files = Vec::new();
    let mut scan_errors = Vec::new();

    let mut exclude_patterns = Vec::with_capacity(config.exclude.len());
    for pat_str in &config.exclude {
        match Pattern::new(pat_str) {
            Ok(pat) => exclude_patterns.push(pat),
            Err(e) => scan_errors.push(ScanError {
                file: PathBuf::from(pat_str),
                kind: ScanErrorKind::InvalidPattern,
                message: format!("Invalid exclude glob pattern '{pat_str}': {e}"),
            }),
        }
    }

    for pattern in &config.patterns {
        if is_glob_pattern(pattern) {
            expand_glob(pattern, &exclude_patterns, &mut files, &mut scan_errors);
            continue;
        }

        let root = PathBuf::from(pattern);
        if root.is_file() {
            if !matches_exclude(&root, &exclude_patterns) {
                files.push(root);
            }
        } else if root.is_dir() {
            walk_dir(&root, config, &exclude_patterns, &mut files, &mut scan_errors);
        }
    }

    files.sort();
    files.dedup();
    tracing::debug!(files = files.len(), errors = scan_errors.len(), "Discovered files");
    (files, scan_errors)
}

fn expand_glob(
    pattern: &str,
    exclude_patterns: &[Pattern],
    files: &mut Vec<PathBuf>,
    scan_errors: &mut Vec<ScanError>,
) {
    let entries = match glob::glob(pattern) {
        Ok(entries) => entries,
        Err(e) => {
            scan_errors.push(ScanError {
                file: PathBuf::from(pattern),
                kind: ScanErrorKind::InvalidPattern,
                message: format!("Invalid glob pattern '{pattern}': {e}"),
            });
            return;
        }
    };

    for entry in entries {
        match entry {
            Ok(path) => {
                if path.is_file() && !matches_exclude(&path, exclude_patterns) {
                    files.push(path);
                }
            }
            Err(e) => scan_errors.push(ScanError {
                file: e.path().to_path_buf(),
                kind: ScanErrorKind::WalkError,
                message: format!("Glob expansion error: {e}"),
            }),
        }
    }
}

fn walk_dir(
    root: &Path,
    config: &FsSourceConfig,
    exclude_patterns: &[Pattern],
    files: &mut Vec<PathBuf>,
    scan_errors: &mut Vec<ScanError>,
) {
    // Canonicalize the root once so we can enforce the boundary for every entry.
    let canonical_root = match root.canonicalize() {
        Ok(r) => r,
        Err(e) => {
            scan_errors.push(ScanError {
                file: root.to_path_buf(),
                kind: ScanErrorKind::IoError,
                message: format!("Failed to canonicalize root path: {e}"),
            });
            return;
        }
    };

    for entry_result in WalkDir::new(root)
        .follow_links(config.follow_links)
        .max_depth(config.max_depth)
        .into_iter()
        .filter_entry(is_not_skip_dir)
    {
        let entry = match entry_result {
            Ok(e) => e,
            Err(walk_err) => {
                let path = walk_err
                    .path()
                    .map_or_else(|| root.to_path_buf(), Path::to_path_buf);
                scan_errors.push(ScanError {
                    file: path,
                    kind: ScanErrorKind::WalkError,
                    message: format!("Directory traversal error: {walk_err}"),
                });
                continue;
            }
        };

        let file_path = entry.path();
        if !file_path.is_file() {
            continue;
        }

        match file_path.canonicalize() {
            Ok(canonical_path) if !canonical_path.starts_with(&canonical_root) => {
                scan_errors.push(ScanError {
                    file: file_path.to_path_buf(),
                    kind: ScanErrorKind::OutsideRoot,
                    message: format!(
                        "Path resolves outside the checked directory: {} -> {}",
                        file_path.display(),
                        canonical_path.display()
                    ),
                });
                continue;
            }
            Ok(_) => {}
            Err(e) => {
                scan_errors.push(ScanError {
                    file: file_path.to_path_buf(),
                    kind: ScanErrorKind::IoError,
                    message: format!("Failed to canonicalize path: {e}"),
                });
                continue;
            }
        }

        // Skip devices, pipes, sockets: only regular files
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileTypeExt;
            if let Ok(ft) = entry.metadata().map(|m| m.file_type())
                && (ft.is_block_device() || ft.is_char_device() || ft.is_fifo() || ft.is_socket())
            {
                continue;
            }
        }

        if matches_exclude(file_path, exclude_patterns) {
            continue;
        }

        files.push(file_path.to_path_buf());
    }
}

/// Read a file using a bounded read, enforcing `max_file_size`.
///
/// Uses `Read::take` so the size check and the read are the same operation.
///
/// # Errors
///
/// Returns a `ScanError` if the file cannot be opened or read, or exceeds
/// `max_file_size`.
pub fn read_file_bounded(path: &Path, max_file_size: u64) -> Result<Vec<u8>, ScanError> {
    let file = std::fs::File::open(path).map_err(|e| ScanError {
        file: path.to_owned(),
        kind: ScanErrorKind::IoError,
        message: format!("Failed to open file: {e}"),
    })?;

    // Read at most max_file_size + 1 bytes to detect oversized files
    let mut buffer = Vec::new();
    file.take(max_file_size.saturating_add(1))
        .read_to_end(&mut buffer)
        .map_err(|e| ScanError {
            file: path.to_owned(),
            kind: ScanErrorKind::IoError,
            message: format!("Failed to read file: {e}"),
        })?;

    if buffer.len() as u64 > max_file_size {
        return Err(ScanError {
            file: path.to_owned(),
            kind: ScanErrorKind::FileTooLarge,
            message: format!("File exceeds maximum size of {max_file_size} bytes"),
        });
    }

    Ok(buffer)
}

/// Open `path` as a record in the requested representation.
///
/// # Errors
///
/// Returns a `ScanError` if the file cannot be opened (or, in buffer mode,
/// read within the size limit).
pub fn open_file(
    path: &Path,
    mode: ContentMode,
    max_file_size: u64,
) -> Result<FileRecord, ScanError> {
    match mode {
        ContentMode::Buffer => {
            read_file_bounded(path, max_file_size).map(|bytes| FileRecord::buffer(path, bytes))
        }
        ContentMode::Stream => std::fs::File::open(path)
            .map(|file| FileRecord::stream(path, file))
            .map_err(|e| ScanError {
                file: path.to_owned(),
                kind: ScanErrorKind::IoError,
                message: format!("Failed to open file: {e}"),
            }),
    }
}

/// Lazily open each of `paths`, in order.
pub fn open_files(
    paths: Vec<PathBuf>,
    mode: ContentMode,
    max_file_size: u64,
) -> impl Iterator<Item = Result<FileRecord, ScanError>> {
    paths
        .into_iter()
        .map(move |path| open_file(&path, mode, max_file_size))
}
