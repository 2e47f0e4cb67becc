//! Header template loading and matching.

use std::io::{self, Read};
use std::path::Path;

use memchr::memmem::{self, Finder};

use crate::error::ConfigurationError;

/// Size of each read when inspecting a streamed file.
const CHUNK_SIZE: usize = 8 * 1024;

/// Read the header template at `path`.
///
/// # Errors
///
/// Returns a `ConfigurationError` naming `path` if it is missing, is not a
/// regular file, or cannot be read as UTF-8 text.
pub fn load_header(path: &Path) -> Result<String, ConfigurationError> {
    if !path.is_file() {
        return Err(ConfigurationError {
            path: path.to_path_buf(),
            source: io::Error::new(io::ErrorKind::NotFound, "not a regular file"),
        });
    }
    std::fs::read_to_string(path).map_err(|source| ConfigurationError {
        path: path.to_path_buf(),
        source,
    })
}

/// Whether `content` contains `header` verbatim.
///
/// Exact and case-sensitive; no whitespace or line-ending normalization.
/// An empty header is contained in everything.
#[must_use]
pub fn contains_header(content: &[u8], header: &str) -> bool {
    memmem::find(content, header.as_bytes()).is_some()
}

/// Read `reader` chunk by chunk until `finder`'s needle shows up or the reader is exhausted.
///
/// Returns whether the needle was found together with every byte consumed
/// along the way. Nothing past the chunk containing the match is read.
///
/// # Errors
///
/// Propagates any I/O error other than `Interrupted`.
pub fn scan_reader(reader: &mut dyn Read, finder: &Finder<'_>) -> io::Result<(bool, Vec<u8>)> {
    let needle_len = finder.needle().len();
    let mut consumed = Vec::new();
    if needle_len == 0 {
        return Ok((true, consumed));
    }

    let mut chunk = vec![0u8; CHUNK_SIZE];
    loop {
        let n = match reader.read(&mut chunk) {
            Ok(0) => return Ok((false, consumed)),
            Ok(n) => n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        };
        // A match may straddle the previous chunk boundary.
        let search_from = consumed.len().saturating_sub(needle_len - 1);
        consumed.extend_from_slice(&chunk[..n]);
        if finder.find(&consumed[search_from..]).is_some() {
            return Ok((true, consumed));
        }
    }
}
