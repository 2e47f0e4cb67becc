//! File records flowing through the check.

use std::fmt;
use std::io::Read;
use std::path::{Path, PathBuf};

/// The contents of a file record, in the representation the source chose.
pub enum Contents {
    /// No contents (e.g. a directory entry). Forwarded without inspection.
    Null,
    /// Fully materialized bytes.
    Buffer(Vec<u8>),
    /// An incrementally readable byte stream.
    Stream(Box<dyn Read + Send>),
}

impl fmt::Debug for Contents {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("Null"),
            Self::Buffer(bytes) => f.debug_tuple("Buffer").field(&bytes.len()).finish(),
            Self::Stream(_) => f.write_str("Stream(..)"),
        }
    }
}

/// A file handed over by the host pipeline: a path plus its contents.
///
/// The check only inspects and forwards records; it never changes their bytes
/// or their `Contents` variant.
#[derive(Debug)]
pub struct FileRecord {
    pub path: PathBuf,
    pub contents: Contents,
}

impl FileRecord {
    #[must_use]
    pub fn buffer(path: impl Into<PathBuf>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Buffer(bytes.into()),
        }
    }

    #[must_use]
    pub fn stream(path: impl Into<PathBuf>, reader: impl Read + Send + 'static) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Stream(Box::new(reader)),
        }
    }

    #[must_use]
    pub fn null(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            contents: Contents::Null,
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    pub fn is_null(&self) -> bool {
        matches!(self.contents, Contents::Null)
    }

    #[must_use]
    pub fn is_buffer(&self) -> bool {
        matches!(self.contents, Contents::Buffer(_))
    }

    #[must_use]
    pub fn is_stream(&self) -> bool {
        matches!(self.contents, Contents::Stream(_))
    }

    /// Drain the contents into memory, whatever their representation.
    ///
    /// Consumes a stream; intended for terminal consumers.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised by the stream.
    pub fn read_contents(self) -> std::io::Result<Vec<u8>> {
        match self.contents {
            Contents::Null => Ok(Vec::new()),
            Contents::Buffer(bytes) => Ok(bytes),
            Contents::Stream(mut reader) => {
                let mut bytes = Vec::new();
                reader.read_to_end(&mut bytes)?;
                Ok(bytes)
            }
        }
    }
}
