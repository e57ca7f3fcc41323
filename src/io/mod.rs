//! Byte sources for dump files.
//!
//! [`Fetcher`] opens a dump either from a local directory or over plain HTTP
//! and hands back a [`DumpStream`]. Zip archives additionally need random
//! access to locate their central directory, which the [`ReadAt`] trait
//! provides over local files and in-memory buffers.

mod http;
mod local;

pub use http::RemoteBody;
pub use local::{LocalFile, LocalFileReader};

use std::fmt;
use std::io::{self, Read};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info};

use crate::catalog::{DOWNLOAD_GEONAMES_ORG_URL, DumpFile};
use crate::error::{Error, Result};

/// Trait for random access reading from a data source
pub trait ReadAt: Send + Sync {
    /// Read data at the specified offset into the buffer
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize>;

    /// Get the total size of the data source
    fn size(&self) -> u64;

    /// Fill `buf` completely, failing on a short source.
    fn read_exact_at(&self, mut offset: u64, mut buf: &mut [u8]) -> io::Result<()> {
        while !buf.is_empty() {
            match self.read_at(offset, buf) {
                Ok(0) => {
                    return Err(io::Error::new(
                        io::ErrorKind::UnexpectedEof,
                        "source ended before the requested range",
                    ));
                }
                Ok(n) => {
                    offset += n as u64;
                    buf = &mut buf[n..];
                }
                Err(e) if e.kind() == io::ErrorKind::Interrupted => {}
                Err(e) => return Err(e),
            }
        }
        Ok(())
    }
}

impl ReadAt for Vec<u8> {
    fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        let start = usize::try_from(offset).unwrap_or(usize::MAX).min(self.len());
        let n = buf.len().min(self.len() - start);
        buf[..n].copy_from_slice(&self[start..start + n]);
        Ok(n)
    }

    fn size(&self) -> u64 {
        self.len() as u64
    }
}

/// Where dump bytes come from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchSource {
    Filesystem,
    Remote,
}

impl FromStr for FetchSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "fs" | "filesystem" | "local" => Ok(FetchSource::Filesystem),
            "http" | "remote" => Ok(FetchSource::Remote),
            other => Err(Error::UnknownSource(other.to_string())),
        }
    }
}

impl fmt::Display for FetchSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchSource::Filesystem => f.write_str("fs"),
            FetchSource::Remote => f.write_str("http"),
        }
    }
}

/// Settings shared by every fetch.
#[derive(Debug, Clone)]
pub struct FetcherConfig {
    /// Base URL the dump name is appended to.
    pub remote_url: String,
    /// Directory holding local dumps, and receiving downloads.
    pub local_root: PathBuf,
    pub connect_timeout: Duration,
}

impl Default for FetcherConfig {
    fn default() -> Self {
        Self {
            remote_url: DOWNLOAD_GEONAMES_ORG_URL.to_string(),
            local_root: PathBuf::from("."),
            connect_timeout: Duration::from_secs(30),
        }
    }
}

impl FetcherConfig {
    pub fn with_remote_url(mut self, url: impl Into<String>) -> Self {
        self.remote_url = url.into();
        self
    }

    pub fn with_local_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.local_root = root.into();
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    pub fn url_for(&self, dump: &DumpFile) -> String {
        format!("{}{}", self.remote_url, dump.name)
    }

    pub fn path_for(&self, dump: &DumpFile) -> PathBuf {
        self.local_root.join(dump.name.as_ref())
    }
}

/// An opened dump, before any archive handling.
///
/// Dropping it closes the file or releases the HTTP connection.
pub enum DumpStream {
    Local(LocalFile),
    Remote(RemoteBody),
}

impl DumpStream {
    /// Path or URL the bytes come from.
    pub fn location(&self) -> String {
        match self {
            DumpStream::Local(file) => file.path().display().to_string(),
            DumpStream::Remote(body) => body.url().to_string(),
        }
    }
}

impl Read for DumpStream {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        match self {
            DumpStream::Local(file) => file.read(buf),
            DumpStream::Remote(body) => body.read(buf),
        }
    }
}

/// Opens dumps from the configured local root or remote base URL.
pub struct Fetcher {
    config: FetcherConfig,
    client: Client,
}

impl Fetcher {
    pub fn new(config: FetcherConfig) -> Result<Self> {
        let client = Client::builder()
            .connect_timeout(config.connect_timeout)
            .timeout(None::<Duration>)
            .build()
            .map_err(|e| Error::Transport {
                url: config.remote_url.clone(),
                source: Box::new(e),
            })?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &FetcherConfig {
        &self.config
    }

    /// Open `dump` from `source`.
    ///
    /// A remote stream holds an open connection until it is dropped.
    pub fn open(&self, source: FetchSource, dump: &DumpFile) -> Result<DumpStream> {
        match source {
            FetchSource::Filesystem => {
                let path = self.config.path_for(dump);
                debug!(path = %path.display(), "opening local dump");
                Ok(DumpStream::Local(LocalFile::open(&path)?))
            }
            FetchSource::Remote => {
                let url = self.config.url_for(dump);
                debug!(%url, "requesting remote dump");
                Ok(DumpStream::Remote(http::get(&self.client, &url)?))
            }
        }
    }

    /// Download `dump` into the local root, returning the written path.
    ///
    /// The body is spooled to a temp file next to the destination and moved
    /// into place only once complete, so a failed download never leaves a
    /// partial dump behind and a 404 creates no file at all.
    pub fn copy_to_local_file(&self, dump: &DumpFile) -> Result<PathBuf> {
        let url = self.config.url_for(dump);
        let path = self.config.path_for(dump);
        let mut body = http::get(&self.client, &url)?;

        let dir = path
            .parent()
            .filter(|parent| !parent.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let save_error = |source: io::Error| Error::Save {
            path: path.clone(),
            source,
        };
        let mut spool = tempfile::NamedTempFile::new_in(dir).map_err(save_error)?;

        let written = io::copy(&mut body, spool.as_file_mut()).map_err(|e| {
            match Error::from_read(e) {
                Error::Io(source) => save_error(source),
                other => other,
            }
        })?;
        spool.as_file().sync_all().map_err(save_error)?;
        spool.persist(&path).map_err(|e| save_error(e.error))?;

        info!(%url, path = %path.display(), bytes = written, "saved dump");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{CITIES_500, TIME_ZONES};

    #[test]
    fn source_names_parse() {
        assert_eq!("fs".parse::<FetchSource>().unwrap(), FetchSource::Filesystem);
        assert_eq!("http".parse::<FetchSource>().unwrap(), FetchSource::Remote);
        assert!(matches!(
            "ftp".parse::<FetchSource>(),
            Err(Error::UnknownSource(name)) if name == "ftp"
        ));
    }

    #[test]
    fn config_joins_names() {
        let config = FetcherConfig::default().with_local_root("/data/geonames");
        assert_eq!(
            config.url_for(&CITIES_500),
            "https://download.geonames.org/export/dump/cities500.zip"
        );
        assert_eq!(
            config.path_for(&TIME_ZONES),
            PathBuf::from("/data/geonames/timeZones.txt")
        );
    }

    #[test]
    fn missing_local_dump_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let fetcher = Fetcher::new(FetcherConfig::default().with_local_root(dir.path())).unwrap();
        match fetcher.open(FetchSource::Filesystem, &TIME_ZONES) {
            Err(Error::NotFound { location }) => assert!(location.ends_with("timeZones.txt")),
            Err(other) => panic!("unexpected {other:?}"),
            Ok(_) => panic!("expected NotFound"),
        }
    }

    #[test]
    fn buffer_read_at_clamps_to_end() {
        let data = b"hello world".to_vec();
        let mut buf = [0u8; 8];
        assert_eq!(data.read_at(6, &mut buf).unwrap(), 5);
        assert_eq!(&buf[..5], b"world");
        assert_eq!(data.read_at(64, &mut buf).unwrap(), 0);
        assert!(data.read_exact_at(6, &mut buf).is_err());
    }
}
