//! Record schemas for the tab-delimited dump formats.
//!
//! Every dump row binds to a record type by column position. A record type
//! declares its ordered column list in [`Record::SCHEMA`] and builds itself
//! from a [`Columns`] view of one split row. [`Columns`] does the coercion:
//! it knows which columns the schema marks required, turns empty optional
//! columns into `None`, and reports failures as a [`FieldError`] naming the
//! column.
//!
//! ## Example
//!
//! ```
//! use geodump::schema::{Record, UserTag};
//!
//! let tag = UserTag::from_line("2988507\tcapital").unwrap();
//! assert_eq!(tag.geoname_id, 2988507);
//! assert_eq!(tag.to_line(), "2988507\tcapital");
//! ```

mod records;

pub use records::*;

use std::fmt::Display;
use std::str::FromStr;

use time::Date;
use time::format_description::BorrowedFormatItem;
use time::macros::format_description;

/// Column separator of every dump file.
pub const DELIMITER: char = '\t';

const DATE_FORMAT: &[BorrowedFormatItem<'_>] = format_description!("[year]-[month]-[day]");

/// Coercion applied to a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    Integer,
    Float,
    /// `YYYY-MM-DD`
    Date,
    /// One of a fixed set of codes, e.g. [`FeatureClass`].
    Code,
    /// Comma-separated values.
    List,
    /// `1` for true, empty for false.
    Flag,
}

/// One column of a record schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Field {
    pub name: &'static str,
    pub kind: FieldKind,
    pub required: bool,
}

impl Field {
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: true,
        }
    }

    pub const fn optional(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            required: false,
        }
    }
}

/// A column that could not be bound to its field.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FieldError {
    #[error("expected {expected} columns, found {found}")]
    ColumnCount { expected: usize, found: usize },

    #[error("column {index} ({name}) is required but empty")]
    Missing { index: usize, name: &'static str },

    #[error("column {index} ({name}) has invalid value {value:?}: {reason}")]
    Invalid {
        index: usize,
        name: &'static str,
        value: String,
        reason: String,
    },
}

/// A type that one dump row decodes into.
pub trait Record: Sized {
    /// Columns in file order.
    const SCHEMA: &'static [Field];

    /// Build the record from a row already checked against [`Self::SCHEMA`].
    fn from_columns(columns: &Columns<'_>) -> Result<Self, FieldError>;

    /// Render the record back into columns, in schema order.
    fn to_columns(&self) -> Vec<String>;

    /// Column names implied by the schema, for files without a header line.
    fn header() -> Vec<&'static str> {
        Self::SCHEMA.iter().map(|f| f.name).collect()
    }

    fn from_line(line: &str) -> Result<Self, FieldError> {
        let columns = Columns::split(line, Self::SCHEMA)?;
        Self::from_columns(&columns)
    }

    fn to_line(&self) -> String {
        self.to_columns().join("\t")
    }
}

/// Split view of one row, bound to the schema that will read it.
pub struct Columns<'a> {
    values: Vec<&'a str>,
    schema: &'static [Field],
}

impl<'a> Columns<'a> {
    /// Split `line` on tabs, requiring exactly one value per schema field.
    pub fn split(line: &'a str, schema: &'static [Field]) -> Result<Self, FieldError> {
        Self::new(line.split(DELIMITER).collect(), schema)
    }

    pub fn new(values: Vec<&'a str>, schema: &'static [Field]) -> Result<Self, FieldError> {
        if values.len() != schema.len() {
            return Err(FieldError::ColumnCount {
                expected: schema.len(),
                found: values.len(),
            });
        }
        Ok(Self { values, schema })
    }

    /// Raw value, `None` when empty. Empty required columns are an error.
    fn raw(&self, index: usize) -> Result<Option<&'a str>, FieldError> {
        let value = self.values[index];
        if !value.is_empty() {
            return Ok(Some(value));
        }
        let field = &self.schema[index];
        if field.required {
            Err(FieldError::Missing {
                index,
                name: field.name,
            })
        } else {
            Ok(None)
        }
    }

    fn invalid(&self, index: usize, reason: impl Display) -> FieldError {
        FieldError::Invalid {
            index,
            name: self.schema[index].name,
            value: self.values[index].to_string(),
            reason: reason.to_string(),
        }
    }

    pub fn text(&self, index: usize) -> Result<String, FieldError> {
        Ok(self.raw(index)?.unwrap_or_default().to_string())
    }

    pub fn opt_text(&self, index: usize) -> Result<Option<String>, FieldError> {
        Ok(self.raw(index)?.map(str::to_string))
    }

    /// Integer, float or code column.
    pub fn parse<T>(&self, index: usize) -> Result<T, FieldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        match self.opt_parse(index)? {
            Some(value) => Ok(value),
            None => Err(FieldError::Missing {
                index,
                name: self.schema[index].name,
            }),
        }
    }

    pub fn opt_parse<T>(&self, index: usize) -> Result<Option<T>, FieldError>
    where
        T: FromStr,
        T::Err: Display,
    {
        self.raw(index)?
            .map(|value| value.parse().map_err(|e| self.invalid(index, e)))
            .transpose()
    }

    pub fn date(&self, index: usize) -> Result<Date, FieldError> {
        match self.opt_date(index)? {
            Some(date) => Ok(date),
            None => Err(FieldError::Missing {
                index,
                name: self.schema[index].name,
            }),
        }
    }

    pub fn opt_date(&self, index: usize) -> Result<Option<Date>, FieldError> {
        self.raw(index)?
            .map(|value| parse_date(value).map_err(|e| self.invalid(index, e)))
            .transpose()
    }

    /// Comma-separated column; empty means no items.
    pub fn list(&self, index: usize) -> Result<Vec<String>, FieldError> {
        Ok(self
            .raw(index)?
            .map(|value| value.split(',').map(str::to_string).collect())
            .unwrap_or_default())
    }

    pub fn flag(&self, index: usize) -> Result<bool, FieldError> {
        match self.raw(index)? {
            None => Ok(false),
            Some("1") => Ok(true),
            Some(_) => Err(self.invalid(index, "expected 1 or empty")),
        }
    }
}

/// Parse a `YYYY-MM-DD` date as written in the dumps.
pub fn parse_date(value: &str) -> Result<Date, time::error::Parse> {
    Date::parse(value, DATE_FORMAT)
}

pub(crate) fn render_opt<T: Display>(value: &Option<T>) -> String {
    value.as_ref().map(ToString::to_string).unwrap_or_default()
}

pub(crate) fn render_date(date: &Date) -> String {
    format!(
        "{:04}-{:02}-{:02}",
        date.year(),
        u8::from(date.month()),
        date.day()
    )
}

pub(crate) fn render_list(items: &[String]) -> String {
    items.join(",")
}

pub(crate) fn render_flag(flag: bool) -> String {
    String::from(if flag { "1" } else { "" })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    const SAMPLE: &[Field] = &[
        Field::required("id", FieldKind::Integer),
        Field::optional("label", FieldKind::Text),
        Field::optional("when", FieldKind::Date),
        Field::required("score", FieldKind::Float),
        Field::optional("tags", FieldKind::List),
        Field::optional("preferred", FieldKind::Flag),
    ];

    #[test]
    fn accessors_coerce_by_kind() {
        let columns = Columns::split("7\t\t2024-02-29\t1.5\ta,b\t1", SAMPLE).unwrap();
        assert_eq!(columns.parse::<u64>(0).unwrap(), 7);
        assert_eq!(columns.opt_text(1).unwrap(), None);
        assert_eq!(
            columns.opt_date(2).unwrap(),
            Some(Date::from_calendar_date(2024, Month::February, 29).unwrap())
        );
        assert_eq!(columns.parse::<f64>(3).unwrap(), 1.5);
        assert_eq!(columns.list(4).unwrap(), vec!["a", "b"]);
        assert!(columns.flag(5).unwrap());
    }

    #[test]
    fn empty_optional_columns_are_absent() {
        let columns = Columns::split("7\t\t\t1.5\t\t", SAMPLE).unwrap();
        assert_eq!(columns.opt_text(1).unwrap(), None);
        assert_eq!(columns.opt_date(2).unwrap(), None);
        assert!(columns.list(4).unwrap().is_empty());
        assert!(!columns.flag(5).unwrap());
    }

    #[test]
    fn empty_required_column_names_the_field() {
        let columns = Columns::split("\tx\t\t1.5\t\t", SAMPLE).unwrap();
        assert_eq!(
            columns.parse::<u64>(0).unwrap_err(),
            FieldError::Missing {
                index: 0,
                name: "id"
            }
        );
    }

    #[test]
    fn non_numeric_value_is_invalid() {
        let columns = Columns::split("7\t\t\tabc\t\t", SAMPLE).unwrap();
        match columns.parse::<f64>(3).unwrap_err() {
            FieldError::Invalid {
                index, name, value, ..
            } => {
                assert_eq!(index, 3);
                assert_eq!(name, "score");
                assert_eq!(value, "abc");
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn bad_date_and_flag_are_invalid() {
        let columns = Columns::split("7\t\t2024-13-01\t1\t\tyes", SAMPLE).unwrap();
        assert!(matches!(
            columns.opt_date(2),
            Err(FieldError::Invalid { index: 2, .. })
        ));
        assert!(matches!(
            columns.flag(5),
            Err(FieldError::Invalid { index: 5, .. })
        ));
    }

    #[test]
    fn column_count_must_match_schema() {
        assert_eq!(
            Columns::split("7\t\t", SAMPLE).err(),
            Some(FieldError::ColumnCount {
                expected: 6,
                found: 3
            })
        );
    }

    #[test]
    fn date_rendering_pads_components() {
        let date = Date::from_calendar_date(2007, Month::March, 4).unwrap();
        assert_eq!(render_date(&date), "2007-03-04");
    }
}
