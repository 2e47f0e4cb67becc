//! The per-file header check and its stream adapter.
//!
//! `LicenseCheck::check` turns one `FileRecord` into a `CheckOutcome`: an
//! optional `HeaderEvent` plus either the forwarded record or an error.
//! `CheckStream` drives it over any iterator of records and flattens the
//! outcomes into the `Log` / `Data` / `Error` sequence a host pipeline sees.

use std::collections::VecDeque;
use std::io::{Cursor, Read};
use std::path::PathBuf;

use memchr::memmem::Finder;
use serde::Serialize;

use crate::config::LicenseCheckConfig;
use crate::error::{ConfigurationError, Error, MissingHeaderError, ReadError};
use crate::file::{Contents, FileRecord};
use crate::header::{load_header, scan_reader};

/// Message of a `HeaderEvent` for a file containing the header.
pub const HEADER_PRESENT: &str = "Header present";
/// Message of a `HeaderEvent` for a file lacking the header.
pub const HEADER_NOT_PRESENT: &str = "Header not present";

/// Whether a file contains the header template.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum HeaderStatus {
    Present,
    Absent,
}

impl HeaderStatus {
    /// `Present` if the header was found, `Absent` otherwise.
    #[must_use]
    pub fn from_found(found: bool) -> Self {
        if found { Self::Present } else { Self::Absent }
    }

    /// Text of the `HeaderEvent` reported for this status.
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            Self::Present => HEADER_PRESENT,
            Self::Absent => HEADER_NOT_PRESENT,
        }
    }
}

/// Informational per-file notification, emitted when logging is enabled.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeaderEvent {
    pub msg: &'static str,
    pub path: PathBuf,
}

/// Everything one call to `LicenseCheck::check` produced.
#[derive(Debug)]
pub struct CheckOutcome {
    /// `None` when the record had no contents to inspect or could not be read.
    pub status: Option<HeaderStatus>,
    /// Present iff logging is enabled and the record was inspected.
    pub event: Option<HeaderEvent>,
    /// The record to hand downstream, or the error raised for it.
    pub forward: Result<FileRecord, Error>,
}

/// A header check bound to one loaded header template.
///
/// Immutable once built; share it by reference across any number of checks.
#[derive(Debug, Clone)]
pub struct LicenseCheck {
    finder: Finder<'static>,
    blocking: bool,
    log: bool,
}

impl LicenseCheck {
    /// Load the header template and build the check.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigurationError` if `config.path` is not a readable file.
    pub fn new(config: &LicenseCheckConfig) -> Result<Self, ConfigurationError> {
        let header = load_header(&config.path)?;
        tracing::debug!(
            path = %config.path.display(),
            bytes = header.len(),
            "Loaded license header template"
        );
        Ok(Self::with_header(&header, config.blocking, config.log))
    }

    fn with_header(header: &str, blocking: bool, log: bool) -> Self {
        Self {
            finder: Finder::new(header).into_owned(),
            blocking,
            log,
        }
    }

    /// Determine whether `file` contains the header without changing its representation.
    ///
    /// A buffered record is searched in place. A streamed record is read only
    /// until the header is found; the returned record replays the consumed
    /// bytes and then continues with the untouched rest of the original
    /// reader. Null records are returned as-is with a `None` status.
    ///
    /// # Errors
    ///
    /// Returns a `ReadError` if a streamed record fails while being read.
    pub fn inspect(
        &self,
        file: FileRecord,
    ) -> Result<(Option<HeaderStatus>, FileRecord), ReadError> {
        let FileRecord { path, contents } = file;
        match contents {
            Contents::Null => Ok((None, FileRecord::null(path))),
            Contents::Buffer(bytes) => {
                let status = HeaderStatus::from_found(self.finder.find(&bytes).is_some());
                let file = FileRecord {
                    path,
                    contents: Contents::Buffer(bytes),
                };
                Ok((Some(status), file))
            }
            Contents::Stream(mut reader) => match scan_reader(&mut *reader, &self.finder) {
                Ok((found, consumed)) => {
                    let replay: Box<dyn Read + Send> =
                        Box::new(Cursor::new(consumed).chain(reader));
                    let file = FileRecord {
                        path,
                        contents: Contents::Stream(replay),
                    };
                    Ok((Some(HeaderStatus::from_found(found)), file))
                }
                Err(source) => Err(ReadError { path, source }),
            },
        }
    }

    /// Check one file and decide what happens to it.
    ///
    /// | header | blocking | log   | outcome                                   |
    /// |--------|----------|-------|-------------------------------------------|
    /// | yes    | any      | true  | "Header present" event, file forwarded    |
    /// | yes    | any      | false | file forwarded                            |
    /// | no     | true     | any   | "Header not present" event if log, error  |
    /// | no     | false    | true  | "Header not present" event, file forwarded|
    /// | no     | false    | false | file forwarded                            |
    #[must_use]
    pub fn check(&self, file: FileRecord) -> CheckOutcome {
        let (status, file) = match self.inspect(file) {
            Ok(inspected) => inspected,
            Err(e) => {
                tracing::warn!(
                    path = %e.path.display(),
                    error = %e.source,
                    "Could not read file contents"
                );
                return CheckOutcome {
                    status: None,
                    event: None,
                    forward: Err(e.into()),
                };
            }
        };

        let Some(status) = status else {
            return CheckOutcome {
                status: None,
                event: None,
                forward: Ok(file),
            };
        };

        let event = self.log.then(|| {
            tracing::info!(path = %file.path.display(), "{}", status.message());
            HeaderEvent {
                msg: status.message(),
                path: file.path.clone(),
            }
        });

        let forward = if status == HeaderStatus::Absent && self.blocking {
            let err = MissingHeaderError { path: file.path };
            tracing::warn!("{err}");
            Err(err.into())
        } else {
            Ok(file)
        };

        CheckOutcome {
            status: Some(status),
            event,
            forward,
        }
    }

    /// Run the check over `files`, yielding the host-visible event sequence.
    #[must_use]
    pub fn stream<I>(&self, files: I) -> CheckStream<'_, I::IntoIter>
    where
        I: IntoIterator<Item = FileRecord>,
    {
        CheckStream {
            check: self,
            files: files.into_iter(),
            pending: VecDeque::new(),
        }
    }
}

/// One item of the sequence a `CheckStream` yields.
#[derive(Debug)]
pub enum StreamEvent {
    /// A per-file log event. Always precedes the `Data` or `Error` for that file.
    Log(HeaderEvent),
    /// A file forwarded downstream.
    Data(FileRecord),
    /// An error raised for a file. Later files are still checked.
    Error(Error),
}

/// Iterator adapter applying a `LicenseCheck` to every record of `I`, in order.
#[derive(Debug)]
pub struct CheckStream<'a, I> {
    check: &'a LicenseCheck,
    files: I,
    pending: VecDeque<StreamEvent>,
}

impl<I> Iterator for CheckStream<'_, I>
where
    I: Iterator<Item = FileRecord>,
{
    type Item = StreamEvent;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }

        let outcome = self.check.check(self.files.next()?);
        if let Some(event) = outcome.event {
            self.pending.push_back(StreamEvent::Log(event));
        }
        self.pending.push_back(match outcome.forward {
            Ok(file) => StreamEvent::Data(file),
            Err(e) => StreamEvent::Error(e),
        });
        self.pending.pop_front()
    }
}
