//! ZIP archive parsing and entry extraction.
//!
//! Some dumps are published as zip archives holding a single text file.
//! [`normalize`] turns a fetched [`DumpStream`] into the plain byte stream
//! of that text file, or passes plain dumps straight through.
//!
//! ## Architecture
//!
//! - [`structures`]: ZIP format records (EOCD, ZIP64 records, entries)
//! - [`parser`]: central directory parsing over a [`ReadAt`] source
//! - [`extractor`]: entry lookup and streaming decompression
//!
//! The central directory sits at the end of the archive, so an archive must
//! be randomly accessible before any entry can be found. Local archives are
//! read in place; remote bodies are spooled to an anonymous temp file first.
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED and DEFLATE entries, with CRC-32 verification
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod extractor;
mod parser;
mod structures;

pub use extractor::{EntryReader, ZipExtractor};
pub use parser::ZipParser;
pub use structures::*;

use std::fs::File;
use std::io::{self, Read};
use std::sync::Arc;

use tracing::debug;

use crate::catalog::DumpFile;
use crate::error::{Error, Result};
use crate::io::{DumpStream, LocalFileReader, ReadAt, RemoteBody};

/// Plain text bytes of a dump, ready for the row streamer.
pub type TextStream = Box<dyn Read + Send>;

/// Resolve `stream` to the text file `dump` describes.
///
/// Plain dumps are returned as is. Archives are opened and only the entry
/// named by [`DumpFile::text_file_name`] is streamed; if the archive has no
/// such entry this fails with [`Error::EntryNotFound`].
pub fn normalize(stream: DumpStream, dump: &DumpFile) -> Result<TextStream> {
    if !dump.archive {
        return Ok(Box::new(stream));
    }

    let file = match stream {
        DumpStream::Local(local) => local.into_file(),
        DumpStream::Remote(mut body) => spool(&mut body)?,
    };
    let source = LocalFileReader::new(file)?;
    open_entry(Arc::new(source), &dump.name, &dump.text_file_name())
}

/// Open the entry called `entry` inside `source` as a text stream.
pub fn open_entry<R: ReadAt + 'static>(
    source: Arc<R>,
    archive: &str,
    entry: &str,
) -> Result<TextStream> {
    let extractor = ZipExtractor::new(source);
    let found = extractor
        .find(entry)?
        .ok_or_else(|| Error::EntryNotFound {
            archive: archive.to_string(),
            entry: entry.to_string(),
        })?;
    debug!(archive, entry = %found.file_name, "resolved archive entry");
    Ok(Box::new(extractor.open(&found)?))
}

/// Copy a remote body into an anonymous temp file, removed once dropped.
fn spool(body: &mut RemoteBody) -> Result<File> {
    let mut file = tempfile::tempfile()?;
    let bytes = io::copy(body, &mut file).map_err(Error::from_read)?;
    debug!(url = body.url(), bytes, "spooled remote archive");
    Ok(file)
}
