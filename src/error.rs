use std::error::Error as StdError;
use std::fmt;
use std::io;
use std::path::PathBuf;

use crate::schema::FieldError;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced while fetching, unpacking or decoding a dump.
///
/// Every variant aborts the stream that raised it. Nothing is retried and
/// nothing is skipped; callers that want "log and continue" must wrap their
/// own handler.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A local dump file is missing, or the remote server answered 404.
    #[error("{location} does not exist")]
    NotFound { location: String },

    #[error("{url} returned unexpected status {status}")]
    UnexpectedStatus { status: u16, url: String },

    /// Connection failure, or a body read that failed mid-download.
    #[error("transport error for {url}: {source}")]
    Transport {
        url: String,
        #[source]
        source: Box<dyn StdError + Send + Sync>,
    },

    #[error("archive {archive} has no entry named {entry}")]
    EntryNotFound { archive: String, entry: String },

    #[error("invalid zip archive: {0}")]
    InvalidArchive(String),

    #[error("header has {found} columns, expected {expected}")]
    HeaderMismatch { expected: usize, found: usize },

    /// A row failed schema coercion. `processed` counts the records already
    /// handed to the handler.
    #[error("line {line}: {source} (after {processed} records): {raw:?}")]
    Decode {
        line: u64,
        raw: String,
        processed: u64,
        #[source]
        source: FieldError,
    },

    #[error("line {line} is not valid UTF-8 (after {processed} records)")]
    Encoding { line: u64, processed: u64 },

    #[error("handler failed at line {line} (after {processed} records): {source}")]
    Handler {
        line: u64,
        processed: u64,
        #[source]
        source: anyhow::Error,
    },

    #[error("failed to save {}: {source}", path.display())]
    Save {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("unknown fetch source: {0}")]
    UnknownSource(String),
}

impl Error {
    /// Whether this is a handler error caused by [`Stop`].
    pub fn is_stop(&self) -> bool {
        matches!(self, Error::Handler { source, .. } if source.downcast_ref::<Stop>().is_some())
    }

    /// Classify an I/O error raised while reading a fetched stream.
    ///
    /// Remote bodies tag their read failures with [`TransportFault`], which
    /// turns back into [`Error::Transport`] here.
    pub(crate) fn from_read(err: io::Error) -> Self {
        let is_transport = err
            .get_ref()
            .is_some_and(|inner| inner.is::<TransportFault>());
        if !is_transport {
            return Error::Io(err);
        }
        match err.into_inner().map(|inner| inner.downcast::<TransportFault>()) {
            Some(Ok(fault)) => {
                let TransportFault { url, source } = *fault;
                Error::Transport { url, source }
            }
            _ => Error::Io(io::Error::other("transport fault")),
        }
    }
}

/// Sentinel a handler returns to end a stream early.
///
/// The streamer treats it like any other handler failure; use
/// [`Error::is_stop`] to tell it apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Stop;

impl fmt::Display for Stop {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("stopped by handler")
    }
}

impl StdError for Stop {}

/// Read failure of a remote body, carried through `std::io::Read`.
#[derive(Debug)]
pub(crate) struct TransportFault {
    pub url: String,
    pub source: Box<dyn StdError + Send + Sync>,
}

impl fmt::Display for TransportFault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "reading {}: {}", self.url, self.source)
    }
}

impl StdError for TransportFault {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        Some(self.source.as_ref())
    }
}
