//! Main entry point for the geodump CLI application.
//!
//! Decodes one catalogued dump from a local directory or over HTTP and
//! reports how many records it holds, optionally printing them.

use std::io::{self, BufWriter, Write};
use std::time::Instant;

use anyhow::{Context, Result, bail};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use geodump::catalog::{self, DumpFile, RecordKind};
use geodump::schema::{
    AdminCode5, AdminDivision, AdminSubdivision, AlternateName, AlternateNameDelete,
    AlternateNameModification, Country, FeatureCode, Geoname, GeonameDelete, Hierarchy, Language,
    Shape, TimeZone, UserTag,
};
use geodump::{Cli, FetchSource, Fetcher, GeoNames, Record, Stop};

/// Records between two progress log lines.
const PROGRESS_EVERY: u64 = 100_000;

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(&cli);

    if cli.list {
        list_dumps();
        return Ok(());
    }

    let name = cli.dump.as_deref().unwrap_or_default();
    let Some(dump) = catalog::find(name) else {
        bail!("unknown dump {name:?}; run with -l to list the catalog");
    };
    let dump = match cli.date {
        Some(date) => dump.with_date(date),
        None if dump.needs_date() => dump.with_last_date(),
        None => dump.clone(),
    };

    let fetcher = Fetcher::new(cli.fetcher_config())?;
    if cli.fetch && cli.source == FetchSource::Filesystem {
        let path = fetcher.config().path_for(&dump);
        if !path.exists() {
            let saved = fetcher
                .copy_to_local_file(&dump)
                .with_context(|| format!("downloading {dump}"))?;
            if !cli.is_quiet() {
                let size = std::fs::metadata(&saved).map(|m| m.len()).unwrap_or(0);
                eprintln!("Downloaded {} ({})", saved.display(), format_size(size));
            }
        }
    }

    let geonames = GeoNames::new(cli.source, fetcher);
    let started = Instant::now();
    let count = match dump.kind {
        RecordKind::Geoname => run::<Geoname>(&geonames, &dump, &cli)?,
        RecordKind::AlternateName => run::<AlternateName>(&geonames, &dump, &cli)?,
        RecordKind::Language => run::<Language>(&geonames, &dump, &cli)?,
        RecordKind::TimeZone => run::<TimeZone>(&geonames, &dump, &cli)?,
        RecordKind::Country => run::<Country>(&geonames, &dump, &cli)?,
        RecordKind::FeatureCode => run::<FeatureCode>(&geonames, &dump, &cli)?,
        RecordKind::Hierarchy => run::<Hierarchy>(&geonames, &dump, &cli)?,
        RecordKind::Shape => run::<Shape>(&geonames, &dump, &cli)?,
        RecordKind::UserTag => run::<UserTag>(&geonames, &dump, &cli)?,
        RecordKind::AdminDivision => run::<AdminDivision>(&geonames, &dump, &cli)?,
        RecordKind::AdminSubdivision => run::<AdminSubdivision>(&geonames, &dump, &cli)?,
        RecordKind::AdminCode5 => run::<AdminCode5>(&geonames, &dump, &cli)?,
        RecordKind::AlternateNameDelete => run::<AlternateNameDelete>(&geonames, &dump, &cli)?,
        RecordKind::AlternateNameModification => {
            run::<AlternateNameModification>(&geonames, &dump, &cli)?
        }
        RecordKind::GeonameDelete => run::<GeonameDelete>(&geonames, &dump, &cli)?,
    };

    if !cli.is_quiet() {
        eprintln!(
            "\n{count} records from {dump} in {:.2}s",
            started.elapsed().as_secs_f64()
        );
        if let Some(peak) = peak_rss() {
            eprintln!("peak memory: {}", format_size(peak));
        }
    }

    Ok(())
}

/// Route library logs to stderr; `RUST_LOG` overrides the level picked by `-q`.
fn init_tracing(cli: &Cli) {
    let default = if cli.is_very_quiet() {
        "error"
    } else if cli.quiet > 0 {
        "warn"
    } else {
        "info"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

/// Print the catalog in a table: name, packaging, record type.
fn list_dumps() {
    println!("{:<36}  {:<7}  Record", "Name", "Format");
    println!("{}", "-".repeat(70));
    for dump in catalog::ALL {
        let format = if dump.archive { "zip" } else { "text" };
        println!("{:<36}  {:<7}  {:?}", dump.name, format, dump.kind);
    }
    println!("{}", "-".repeat(70));
    println!("{} dumps", catalog::ALL.len());
}

/// Decode `dump` as `T`, printing each record when asked, and return the
/// number of records handled.
fn run<T: Record>(geonames: &GeoNames, dump: &DumpFile, cli: &Cli) -> Result<u64> {
    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());

    let count = take_records::<T, _>(geonames, dump, cli.limit, |record, count| {
        if cli.print {
            writeln!(out, "{}", record.to_line())?;
        }
        if count % PROGRESS_EVERY == 0 {
            info!(records = count, "progress");
        }
        Ok(())
    })
    .with_context(|| format!("decoding {dump}"))?;

    out.flush()?;
    Ok(count)
}

/// Feed at most `limit` records of `dump` to `each`, along with their
/// 1-based position, and return how many were handled.
///
/// The stream ends as soon as the limit is reached, so rows past it are
/// never read.
fn take_records<T, F>(
    geonames: &GeoNames,
    dump: &DumpFile,
    limit: Option<u64>,
    mut each: F,
) -> geodump::Result<u64>
where
    T: Record,
    F: FnMut(T, u64) -> Result<()>,
{
    if limit == Some(0) {
        return Ok(0);
    }

    let mut count = 0u64;
    let result = geonames.parse::<T, _>(dump, |record| {
        count += 1;
        each(record, count)?;
        if limit == Some(count) {
            return Err(Stop.into());
        }
        Ok(())
    });

    match result {
        Ok(()) => Ok(count),
        Err(e) if e.is_stop() => {
            info!(records = count, "stopped at limit");
            Ok(count)
        }
        Err(e) => {
            warn!(records = count, "decoding stopped early");
            Err(e)
        }
    }
}

/// Peak resident set size of this process, where the platform reports it.
fn peak_rss() -> Option<u64> {
    let status = std::fs::read_to_string("/proc/self/status").ok()?;
    parse_vm_hwm(&status)
}

/// Extract `VmHWM` (in kB) from a `/proc/<pid>/status` listing, as bytes.
fn parse_vm_hwm(status: &str) -> Option<u64> {
    let line = status.lines().find(|line| line.starts_with("VmHWM:"))?;
    let kb: u64 = line
        .trim_start_matches("VmHWM:")
        .split_whitespace()
        .next()?
        .parse()
        .ok()?;
    Some(kb * 1024)
}

/// Format a byte size into a human-readable string.
///
/// ```ignore
/// assert_eq!(format_size(500), "500 bytes");
/// assert_eq!(format_size(1536), "1.50 KB");
/// ```
fn format_size(size: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;
    const GB: u64 = MB * 1024;

    if size >= GB {
        format!("{:.2} GB", size as f64 / GB as f64)
    } else if size >= MB {
        format!("{:.2} MB", size as f64 / MB as f64)
    } else if size >= KB {
        format!("{:.2} KB", size as f64 / KB as f64)
    } else {
        format!("{} bytes", size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use geodump::{Error, FetcherConfig};

    const ZONES: &str = "CountryCode\tTimeZoneId\tGMT offset\tDST offset\trawOffset\n\
                         FR\tEurope/Paris\t1.0\t2.0\t1.0\n\
                         NO\tEurope/Oslo\tbad\t2.0\t1.0\n";

    fn local_zones() -> (tempfile::TempDir, GeoNames) {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("timeZones.txt"), ZONES).unwrap();
        let fetcher = Fetcher::new(FetcherConfig::default().with_local_root(dir.path())).unwrap();
        (dir, GeoNames::new(FetchSource::Filesystem, fetcher))
    }

    #[test]
    fn limit_stops_before_reading_the_next_row() {
        let (_dir, geonames) = local_zones();
        let mut seen = Vec::new();
        let count = take_records::<TimeZone, _>(&geonames, &catalog::TIME_ZONES, Some(1), |tz, _| {
            seen.push(tz.time_zone_id);
            Ok(())
        })
        .unwrap();
        assert_eq!(count, 1);
        assert_eq!(seen, vec!["Europe/Paris"]);
    }

    #[test]
    fn zero_limit_reads_nothing() {
        let (_dir, geonames) = local_zones();
        let mut calls = 0;
        let count = take_records::<TimeZone, _>(&geonames, &catalog::TIME_ZONES, Some(0), |_, _| {
            calls += 1;
            Ok(())
        })
        .unwrap();
        assert_eq!((count, calls), (0, 0));
    }

    #[test]
    fn errors_before_the_limit_are_reported() {
        let (_dir, geonames) = local_zones();
        let result =
            take_records::<TimeZone, _>(&geonames, &catalog::TIME_ZONES, Some(5), |_, _| Ok(()));
        assert!(matches!(result, Err(Error::Decode { line: 3, .. })));
    }

    #[test]
    fn reads_peak_rss_from_proc_status() {
        let status = "Name:\tgeodump\nVmPeak:\t  20000 kB\nVmHWM:\t    1536 kB\nVmRSS:\t 1024 kB\n";
        assert_eq!(parse_vm_hwm(status), Some(1536 * 1024));
        assert_eq!(parse_vm_hwm("Name:\tgeodump\n"), None);
    }

    #[test]
    fn formats_sizes() {
        assert_eq!(format_size(500), "500 bytes");
        assert_eq!(format_size(1536), "1.50 KB");
        assert_eq!(format_size(3 * 1024 * 1024), "3.00 MB");
    }
}
