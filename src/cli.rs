use std::path::PathBuf;

use clap::Parser;
use time::Date;

use crate::catalog::DOWNLOAD_GEONAMES_ORG_URL;
use crate::io::{FetchSource, FetcherConfig};
use crate::schema::parse_date;

#[derive(Parser, Debug)]
#[command(name = "geodump")]
#[command(version)]
#[command(about = "Stream and decode geonames.org data dumps", long_about = None)]
#[command(after_help = "Examples:\n  \
  geodump -l                            list every known dump\n  \
  geodump cities15000 -s http -n 10 -p  print the first ten rows of a remote dump\n  \
  geodump deletes --date 2024-05-01     decode a dated delta from the local root\n  \
  geodump allCountries -d data --fetch  download into data/ if missing, then decode")]
pub struct Cli {
    /// Dump name, with or without extension (e.g. cities500, timeZones.txt)
    #[arg(value_name = "DUMP", required_unless_present = "list")]
    pub dump: Option<String>,

    /// List the dump catalog
    #[arg(short = 'l')]
    pub list: bool,

    /// Where to read dumps from: fs or http
    #[arg(short = 's', long = "source", default_value = "fs", value_parser = parse_source)]
    pub source: FetchSource,

    /// Base URL for http reads and downloads
    #[arg(long = "remote-url", value_name = "URL", default_value = DOWNLOAD_GEONAMES_ORG_URL)]
    pub remote_url: String,

    /// Directory holding local dumps
    #[arg(short = 'd', long = "local-root", value_name = "DIR", default_value = ".")]
    pub local_root: PathBuf,

    /// Download the dump into the local root first when it is missing
    #[arg(long = "fetch")]
    pub fetch: bool,

    /// Date of a delta file (YYYY-MM-DD, default: yesterday)
    #[arg(long = "date", value_name = "DATE", value_parser = parse_cli_date)]
    pub date: Option<Date>,

    /// Print decoded records to stdout as tab-delimited lines
    #[arg(short = 'p', long = "print")]
    pub print: bool,

    /// Stop after this many records
    #[arg(short = 'n', long = "limit", value_name = "N")]
    pub limit: Option<u64>,

    /// Connect timeout in seconds
    #[arg(long = "connect-timeout", value_name = "SECS", default_value_t = 30)]
    pub connect_timeout: u64,

    /// Quiet mode (-qq => quieter)
    #[arg(short = 'q', action = clap::ArgAction::Count)]
    pub quiet: u8,
}

impl Cli {
    pub fn is_quiet(&self) -> bool {
        self.quiet > 0 || self.print
    }

    pub fn is_very_quiet(&self) -> bool {
        self.quiet > 1
    }

    pub fn fetcher_config(&self) -> FetcherConfig {
        FetcherConfig::default()
            .with_remote_url(self.remote_url.clone())
            .with_local_root(self.local_root.clone())
            .with_connect_timeout(std::time::Duration::from_secs(self.connect_timeout))
    }
}

fn parse_source(value: &str) -> Result<FetchSource, String> {
    value.parse().map_err(|e: crate::Error| e.to_string())
}

fn parse_cli_date(value: &str) -> Result<Date, String> {
    parse_date(value).map_err(|e| format!("expected YYYY-MM-DD: {e}"))
}
