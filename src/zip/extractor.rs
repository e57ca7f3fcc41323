use std::io::{self, Read};
use std::sync::Arc;

use flate2::Crc;
use flate2::read::DeflateDecoder;
use tracing::debug;

use crate::error::{Error, Result};
use crate::io::ReadAt;

use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// Opens single entries of a ZIP archive as streams.
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all files in the archive
    pub fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files()
    }

    /// Find the entry called `name`, by full path or base name.
    pub fn find(&self, name: &str) -> Result<Option<ZipFileEntry>> {
        Ok(self.list_files()?.into_iter().find(|e| e.matches(name)))
    }

    /// Stream the decompressed contents of `entry`.
    pub fn open(&self, entry: &ZipFileEntry) -> Result<EntryReader<R>> {
        let data_offset = self.parser.data_offset(entry)?;
        let section = Section {
            source: Arc::clone(self.parser.reader()),
            offset: data_offset,
            remaining: entry.compressed_size,
        };

        let decoded = match entry.compression_method {
            CompressionMethod::Stored => Decoded::Stored(section),
            CompressionMethod::Deflate => Decoded::Deflate(DeflateDecoder::new(section)),
            CompressionMethod::Unknown(method) => {
                return Err(Error::InvalidArchive(format!(
                    "{} uses unsupported compression method {method}",
                    entry.file_name
                )));
            }
        };

        debug!(
            entry = %entry.file_name,
            method = entry.compression_method.as_u16(),
            compressed = entry.compressed_size,
            uncompressed = entry.uncompressed_size,
            "opened archive entry"
        );

        Ok(EntryReader {
            decoded,
            name: entry.file_name.clone(),
            expected_crc: entry.crc32,
            expected_size: entry.uncompressed_size,
            crc: Crc::new(),
            produced: 0,
            verified: false,
        })
    }
}

/// Byte range of the archive holding one entry's compressed data.
struct Section<R: ReadAt> {
    source: Arc<R>,
    offset: u64,
    remaining: u64,
}

impl<R: ReadAt> Read for Section<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if self.remaining == 0 || buf.is_empty() {
            return Ok(0);
        }
        let len = buf.len().min(usize::try_from(self.remaining).unwrap_or(usize::MAX));
        let n = self.source.read_at(self.offset, &mut buf[..len])?;
        if n == 0 {
            return Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "archive ended inside entry data",
            ));
        }
        self.offset += n as u64;
        self.remaining -= n as u64;
        Ok(n)
    }
}

enum Decoded<R: ReadAt> {
    Stored(Section<R>),
    Deflate(DeflateDecoder<Section<R>>),
}

/// Decompressed entry contents, checked against the central directory's
/// size and CRC-32 when the end is reached.
pub struct EntryReader<R: ReadAt> {
    decoded: Decoded<R>,
    name: String,
    expected_crc: u32,
    expected_size: u64,
    crc: Crc,
    produced: u64,
    verified: bool,
}

impl<R: ReadAt> EntryReader<R> {
    fn verify(&mut self) -> io::Result<()> {
        if self.verified {
            return Ok(());
        }
        if self.produced != self.expected_size {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!(
                    "{}: expected {} bytes, decompressed {}",
                    self.name, self.expected_size, self.produced
                ),
            ));
        }
        if self.crc.sum() != self.expected_crc {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("{}: CRC-32 mismatch", self.name),
            ));
        }
        self.verified = true;
        Ok(())
    }
}

impl<R: ReadAt> Read for EntryReader<R> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        if buf.is_empty() {
            return Ok(0);
        }
        let n = match &mut self.decoded {
            Decoded::Stored(section) => section.read(buf)?,
            Decoded::Deflate(decoder) => decoder.read(buf)?,
        };
        if n == 0 {
            self.verify()?;
        } else {
            self.crc.update(&buf[..n]);
            self.produced += n as u64;
        }
        Ok(n)
    }
}
