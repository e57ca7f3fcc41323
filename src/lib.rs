//! # geodump
//!
//! Streaming decoder for the geonames.org data dumps.
//!
//! Dumps are fetched from a local directory or over HTTP, unpacked when they
//! are published as zip archives, and decoded line by line into typed
//! records that are handed to a caller-supplied handler. Memory stays flat
//! regardless of dump size: only one line and one record are alive at a
//! time.
//!
//! ## Features
//!
//! - Catalog of every published dump with its packaging and record type
//! - Local filesystem and plain HTTP sources, plus download-to-disk
//! - ZIP archives, including ZIP64, with STORED and DEFLATE entries
//! - Typed records with checked coercion of every column
//! - Early termination through the [`Stop`] sentinel
//!
//! ## Example
//!
//! ```no_run
//! use geodump::{FetchSource, Fetcher, FetcherConfig, GeoNames, Stop, catalog};
//!
//! fn main() -> anyhow::Result<()> {
//!     let fetcher = Fetcher::new(FetcherConfig::default())?;
//!     let geonames = GeoNames::new(FetchSource::Remote, fetcher);
//!
//!     let mut seen = 0;
//!     let result = geonames.geonames(&catalog::CITIES_15000, |city| {
//!         println!("{} ({})", city.name, city.country_code.unwrap_or_default());
//!         seen += 1;
//!         if seen == 10 {
//!             return Err(Stop.into());
//!         }
//!         Ok(())
//!     });
//!     match result {
//!         Err(e) if !e.is_stop() => Err(e.into()),
//!         _ => Ok(()),
//!     }
//! }
//! ```

pub mod catalog;
pub mod cli;
pub mod error;
pub mod io;
pub mod parser;
pub mod schema;
pub mod stream;
pub mod zip;

pub use catalog::{DumpFile, RecordKind};
pub use cli::Cli;
pub use error::{Error, Result, Stop};
pub use io::{FetchSource, Fetcher, FetcherConfig, ReadAt};
pub use parser::GeoNames;
pub use schema::Record;
pub use stream::{RowFormat, Rows, decode};
