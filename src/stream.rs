//! Line-by-line decoding of tab-delimited dump text into records.
//!
//! [`Rows`] is a lazy iterator: it holds one line buffer and builds one
//! record per call to `next`, so memory stays flat however large the dump
//! is. [`decode`] drives it and feeds each record to a handler, stopping at
//! the first failure.
//!
//! ```
//! use geodump::schema::UserTag;
//! use geodump::stream::{RowFormat, decode};
//!
//! let text = "2988507\tcapital\n2643743\tcapital\n";
//! let mut tags = Vec::new();
//! decode::<UserTag, _, _>(text.as_bytes(), RowFormat::default(), |tag| {
//!     tags.push(tag.geoname_id);
//!     Ok(())
//! })
//! .unwrap();
//! assert_eq!(tags, vec![2988507, 2643743]);
//! ```

use std::io::{BufRead, BufReader, Read};
use std::marker::PhantomData;

use tracing::debug;

use crate::catalog::DumpFile;
use crate::error::{Error, Result};
use crate::schema::{DELIMITER, Record};

/// Line conventions of a dump's text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RowFormat {
    /// The first line names the columns and carries no data.
    pub has_header: bool,
    /// Lines starting with `#` are skipped.
    pub comments: bool,
}

impl From<&DumpFile> for RowFormat {
    fn from(dump: &DumpFile) -> Self {
        Self {
            has_header: dump.has_header,
            comments: dump.comments,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    AwaitHeader,
    Reading,
    Done,
    Failed,
}

/// Lazy iterator of records decoded from `R`.
///
/// After the first error the iterator is fused and yields `None`.
pub struct Rows<R: Read, T: Record> {
    reader: BufReader<R>,
    buf: Vec<u8>,
    format: RowFormat,
    state: State,
    line: u64,
    yielded: u64,
    _record: PhantomData<fn() -> T>,
}

impl<R: Read, T: Record> Rows<R, T> {
    pub fn new(reader: R, format: RowFormat) -> Self {
        Self {
            reader: BufReader::new(reader),
            buf: Vec::with_capacity(1024),
            format,
            state: if format.has_header {
                State::AwaitHeader
            } else {
                State::Reading
            },
            line: 0,
            yielded: 0,
            _record: PhantomData,
        }
    }

    /// 1-based number of the last line read.
    pub fn line_number(&self) -> u64 {
        self.line
    }

    /// Records produced so far.
    pub fn yielded(&self) -> u64 {
        self.yielded
    }

    /// Stop the iterator; used when a consumer gives up on the stream.
    pub fn abort(&mut self) {
        self.state = State::Failed;
    }

    /// Read the next line into `buf` without its terminator.
    /// Returns `false` at end of stream.
    fn read_line(&mut self) -> Result<bool> {
        self.buf.clear();
        let n = self
            .reader
            .read_until(b'\n', &mut self.buf)
            .map_err(Error::from_read)?;
        if n == 0 {
            return Ok(false);
        }
        self.line += 1;
        if self.buf.last() == Some(&b'\n') {
            self.buf.pop();
            if self.buf.last() == Some(&b'\r') {
                self.buf.pop();
            }
        }
        Ok(true)
    }

    fn text(&self) -> Result<&str> {
        std::str::from_utf8(&self.buf).map_err(|_| Error::Encoding {
            line: self.line,
            processed: self.yielded,
        })
    }

    fn read_header(&mut self) -> Result<()> {
        if !self.read_line()? {
            return Ok(());
        }
        let header = self.text()?;
        let found = header.split(DELIMITER).count();
        if found != T::SCHEMA.len() {
            return Err(Error::HeaderMismatch {
                expected: T::SCHEMA.len(),
                found,
            });
        }
        let renamed = header
            .split(DELIMITER)
            .zip(T::SCHEMA)
            .filter(|(name, field)| *name != field.name)
            .count();
        if renamed > 0 {
            debug!(header, renamed, "header names differ from schema, binding by position");
        }
        Ok(())
    }

    fn next_record(&mut self) -> Result<Option<T>> {
        if self.state == State::AwaitHeader {
            self.read_header()?;
            self.state = State::Reading;
        }
        loop {
            if !self.read_line()? {
                return Ok(None);
            }
            let line = self.text()?;
            if line.is_empty() || (self.format.comments && line.starts_with('#')) {
                continue;
            }
            return match T::from_line(line) {
                Ok(record) => Ok(Some(record)),
                Err(source) => Err(Error::Decode {
                    line: self.line,
                    raw: line.to_string(),
                    processed: self.yielded,
                    source,
                }),
            };
        }
    }
}

impl<R: Read, T: Record> Iterator for Rows<R, T> {
    type Item = Result<T>;

    fn next(&mut self) -> Option<Self::Item> {
        if matches!(self.state, State::Done | State::Failed) {
            return None;
        }
        match self.next_record() {
            Ok(Some(record)) => {
                self.yielded += 1;
                Some(Ok(record))
            }
            Ok(None) => {
                self.state = State::Done;
                None
            }
            Err(err) => {
                self.state = State::Failed;
                Some(Err(err))
            }
        }
    }
}

/// Decode every row of `reader` as `T` and pass it to `handler`, in order.
///
/// Stops at the first decode or handler error. A handler error is wrapped
/// in [`Error::Handler`]; side effects it already performed stay in place.
/// Return [`crate::Stop`] from the handler to end early.
pub fn decode<T, R, F>(reader: R, format: RowFormat, mut handler: F) -> Result<()>
where
    T: Record,
    R: Read,
    F: FnMut(T) -> anyhow::Result<()>,
{
    let mut rows = Rows::<R, T>::new(reader, format);
    while let Some(record) = rows.next() {
        if let Err(source) = handler(record?) {
            rows.abort();
            return Err(Error::Handler {
                line: rows.line_number(),
                processed: rows.yielded() - 1,
                source,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stop;
    use crate::schema::{Columns, Field, FieldError, FieldKind};
    use std::io::{self, Cursor};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Town {
        name: String,
        population: Option<u64>,
    }

    impl Record for Town {
        const SCHEMA: &'static [Field] = &[
            Field::required("name", FieldKind::Text),
            Field::optional("population", FieldKind::Integer),
        ];

        fn from_columns(c: &Columns<'_>) -> std::result::Result<Self, FieldError> {
            Ok(Self {
                name: c.text(0)?,
                population: c.opt_parse(1)?,
            })
        }

        fn to_columns(&self) -> Vec<String> {
            vec![
                self.name.clone(),
                self.population.map(|p| p.to_string()).unwrap_or_default(),
            ]
        }
    }

    const HEADED: RowFormat = RowFormat {
        has_header: true,
        comments: false,
    };

    fn town(name: &str, population: u64) -> Town {
        Town {
            name: name.to_string(),
            population: Some(population),
        }
    }

    fn collect(text: &str, format: RowFormat) -> Result<Vec<Town>> {
        let mut towns = Vec::new();
        decode(text.as_bytes(), format, |t: Town| {
            towns.push(t);
            Ok(())
        })?;
        Ok(towns)
    }

    #[test]
    fn header_and_two_rows() {
        let towns = collect("name\tpopulation\nOslo\t709037\nBergen\t291940\n", HEADED).unwrap();
        assert_eq!(towns, vec![town("Oslo", 709037), town("Bergen", 291940)]);
    }

    #[test]
    fn without_header_every_line_is_data() {
        let towns = collect("Oslo\t709037\nBergen\t291940", RowFormat::default()).unwrap();
        assert_eq!(towns.len(), 2);
        assert_eq!(towns[1], town("Bergen", 291940));
    }

    #[test]
    fn empty_optional_column_survives_line_trimming() {
        let towns = collect("Hamlet\t\r\nOslo\t1\r\n", RowFormat::default()).unwrap();
        assert_eq!(
            towns[0],
            Town {
                name: "Hamlet".to_string(),
                population: None
            }
        );
        assert_eq!(towns[1], town("Oslo", 1));
    }

    #[test]
    fn header_column_count_is_checked_before_data() {
        let mut calls = 0;
        let err = decode("name\tpopulation\tarea\nOslo\t1\n".as_bytes(), HEADED, |_: Town| {
            calls += 1;
            Ok(())
        })
        .unwrap_err();
        assert!(matches!(
            err,
            Error::HeaderMismatch {
                expected: 2,
                found: 3
            }
        ));
        assert_eq!(calls, 0);
    }

    #[test]
    fn renamed_header_still_binds_by_position() {
        let towns = collect("town\tinhabitants\nOslo\t709037\n", HEADED).unwrap();
        assert_eq!(towns, vec![town("Oslo", 709037)]);
    }

    #[test]
    fn decode_error_reports_line_and_progress() {
        let text = "Oslo\t1\nBergen\tmany\nTromso\t3\n";
        let mut seen = Vec::new();
        let err = decode(text.as_bytes(), RowFormat::default(), |t: Town| {
            seen.push(t.name);
            Ok(())
        })
        .unwrap_err();
        match err {
            Error::Decode {
                line,
                raw,
                processed,
                source,
            } => {
                assert_eq!(line, 2);
                assert_eq!(raw, "Bergen\tmany");
                assert_eq!(processed, 1);
                assert!(matches!(
                    source,
                    FieldError::Invalid {
                        index: 1,
                        name: "population",
                        ..
                    }
                ));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert_eq!(seen, vec!["Oslo"]);
    }

    #[test]
    fn missing_required_field_is_a_decode_error() {
        let err = collect("\t12\n", RowFormat::default()).unwrap_err();
        assert!(matches!(
            err,
            Error::Decode {
                source: FieldError::Missing { name: "name", .. },
                ..
            }
        ));
    }

    #[test]
    fn handler_error_stops_after_that_record() {
        let text: String = (1..=8).map(|i| format!("t{i}\t{i}\n")).collect();
        let mut calls = 0;
        let err = decode(text.as_bytes(), RowFormat::default(), |_: Town| {
            calls += 1;
            if calls == 5 {
                anyhow::bail!("disk full");
            }
            Ok(())
        })
        .unwrap_err();
        assert_eq!(calls, 5);
        match err {
            Error::Handler {
                line,
                processed,
                source,
            } => {
                assert_eq!(line, 5);
                assert_eq!(processed, 4);
                assert_eq!(source.to_string(), "disk full");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn stop_sentinel_is_distinguishable() {
        let err = decode("a\t1\nb\t2\n".as_bytes(), RowFormat::default(), |_: Town| {
            Err(Stop.into())
        })
        .unwrap_err();
        assert!(err.is_stop());
    }

    #[test]
    fn comments_and_blank_lines_are_skipped() {
        let format = RowFormat {
            has_header: false,
            comments: true,
        };
        let towns = collect("# towns\n\nOslo\t1\n#Bergen\t2\n", format).unwrap();
        assert_eq!(towns, vec![town("Oslo", 1)]);
    }

    #[test]
    fn invalid_utf8_is_reported_with_line() {
        let bytes: &[u8] = b"Oslo\t1\n\xff\xfe\t2\n";
        let result = decode(bytes, RowFormat::default(), |_: Town| Ok(()));
        assert!(matches!(
            result,
            Err(Error::Encoding {
                line: 2,
                processed: 1
            })
        ));
    }

    #[test]
    fn empty_stream_yields_nothing() {
        assert!(collect("", HEADED).unwrap().is_empty());
        assert!(collect("name\tpopulation\n", HEADED).unwrap().is_empty());
    }

    #[test]
    fn decoding_twice_is_identical() {
        let text = "name\tpopulation\nOslo\t709037\nBergen\t\nTromso\t77544\n";
        assert_eq!(collect(text, HEADED).unwrap(), collect(text, HEADED).unwrap());
    }

    #[test]
    fn rows_are_pulled_lazily() {
        // a reader that fails once the first line has been consumed
        struct FailAfter(Cursor<&'static [u8]>);
        impl Read for FailAfter {
            fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
                match self.0.read(buf)? {
                    0 => Err(io::Error::other("boom")),
                    n => Ok(n),
                }
            }
        }

        let mut rows =
            Rows::<_, Town>::new(FailAfter(Cursor::new(&b"Oslo\t1\n"[..])), RowFormat::default());
        assert_eq!(rows.next().unwrap().unwrap(), town("Oslo", 1));
        assert!(matches!(rows.next(), Some(Err(Error::Io(_)))));
        assert!(rows.next().is_none());
    }
}
