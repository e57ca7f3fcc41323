//! Static catalog of the files published under the geonames dump directory.
//!
//! Each [`DumpFile`] says how a file is packaged and which record type its
//! rows decode to. Delta files (`deletes-%s.txt` and friends) carry a `%s`
//! date token that must be substituted with [`DumpFile::with_date`] or
//! [`DumpFile::with_last_date`] before fetching.

use std::borrow::Cow;
use std::fmt;

use time::{Date, OffsetDateTime};

use crate::schema::render_date;

use RecordKind as K;

/// Default remote location of the dumps.
pub const DOWNLOAD_GEONAMES_ORG_URL: &str = "https://download.geonames.org/export/dump/";

const DATE_TOKEN: &str = "%s";

/// Record type a dump decodes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordKind {
    Geoname,
    AlternateName,
    Language,
    TimeZone,
    Country,
    FeatureCode,
    Hierarchy,
    Shape,
    UserTag,
    AdminDivision,
    AdminSubdivision,
    AdminCode5,
    AlternateNameDelete,
    AlternateNameModification,
    GeonameDelete,
}

/// A named dump file and how to read it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpFile {
    /// Remote file name, relative to the base URL or local root.
    pub name: Cow<'static, str>,
    /// Whether the file is a zip archive.
    pub archive: bool,
    /// Text file inside the archive, when it is not `<base name>.txt`.
    pub inner: Option<&'static str>,
    /// Whether `name` embeds a `%s` date token.
    pub dated: bool,
    /// Whether the text starts with a column header line.
    pub has_header: bool,
    /// Whether lines starting with `#` are comments.
    pub comments: bool,
    pub kind: RecordKind,
}

impl DumpFile {
    const fn plain(name: &'static str, kind: RecordKind) -> Self {
        Self {
            name: Cow::Borrowed(name),
            archive: false,
            inner: None,
            dated: false,
            has_header: false,
            comments: false,
            kind,
        }
    }

    const fn zipped(name: &'static str, kind: RecordKind) -> Self {
        let mut dump = Self::plain(name, kind);
        dump.archive = true;
        dump
    }

    const fn dated(name: &'static str, kind: RecordKind) -> Self {
        let mut dump = Self::plain(name, kind);
        dump.dated = true;
        dump
    }

    const fn with_header(mut self) -> Self {
        self.has_header = true;
        self
    }

    const fn with_comments(mut self) -> Self {
        self.comments = true;
        self
    }

    const fn with_inner(mut self, inner: &'static str) -> Self {
        self.inner = Some(inner);
        self
    }

    /// Name of the text file holding the rows.
    ///
    /// For archives this is the configured inner name, or the archive name
    /// with its extension replaced by `.txt`.
    pub fn text_file_name(&self) -> Cow<'_, str> {
        let name: &str = &self.name;
        if !self.archive {
            return Cow::Borrowed(name);
        }
        if let Some(inner) = self.inner {
            return Cow::Borrowed(inner);
        }
        let base = name.rsplit_once('.').map_or(name, |(base, _)| base);
        Cow::Owned(format!("{base}.txt"))
    }

    /// Substitute the date token. Files without one are returned unchanged.
    pub fn with_date(&self, date: Date) -> Self {
        if !self.dated {
            return self.clone();
        }
        Self {
            name: Cow::Owned(self.name.replace(DATE_TOKEN, &render_date(&date))),
            dated: false,
            ..self.clone()
        }
    }

    /// Substitute yesterday's UTC date, the most recent published delta.
    pub fn with_last_date(&self) -> Self {
        let today = OffsetDateTime::now_utc().date();
        self.with_date(today.previous_day().unwrap_or(today))
    }

    /// Whether the date token is still unresolved.
    pub fn needs_date(&self) -> bool {
        self.dated && self.name.contains(DATE_TOKEN)
    }
}

impl fmt::Display for DumpFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

pub const CITIES_500: DumpFile = DumpFile::zipped("cities500.zip", K::Geoname);
pub const CITIES_1000: DumpFile = DumpFile::zipped("cities1000.zip", K::Geoname);
pub const CITIES_5000: DumpFile = DumpFile::zipped("cities5000.zip", K::Geoname);
pub const CITIES_15000: DumpFile = DumpFile::zipped("cities15000.zip", K::Geoname);
pub const ALL_COUNTRIES: DumpFile = DumpFile::zipped("allCountries.zip", K::Geoname);
pub const NO_COUNTRY: DumpFile =
    DumpFile::zipped("no-country.zip", K::Geoname).with_inner("null.txt");
pub const ALTERNATE_NAMES: DumpFile = DumpFile::zipped("alternateNamesV2.zip", K::AlternateName);
pub const LANGUAGE_CODES: DumpFile =
    DumpFile::plain("iso-languagecodes.txt", K::Language).with_header();
pub const TIME_ZONES: DumpFile = DumpFile::plain("timeZones.txt", K::TimeZone).with_header();
pub const COUNTRIES: DumpFile = DumpFile::plain("countryInfo.txt", K::Country).with_comments();
pub const FEATURE_CODES_BG: DumpFile = DumpFile::plain("featureCodes_bg.txt", K::FeatureCode);
pub const FEATURE_CODES_EN: DumpFile = DumpFile::plain("featureCodes_en.txt", K::FeatureCode);
pub const FEATURE_CODES_NB: DumpFile = DumpFile::plain("featureCodes_nb.txt", K::FeatureCode);
pub const FEATURE_CODES_NN: DumpFile = DumpFile::plain("featureCodes_nn.txt", K::FeatureCode);
pub const FEATURE_CODES_NO: DumpFile = DumpFile::plain("featureCodes_no.txt", K::FeatureCode);
pub const FEATURE_CODES_RU: DumpFile = DumpFile::plain("featureCodes_ru.txt", K::FeatureCode);
pub const FEATURE_CODES_SV: DumpFile = DumpFile::plain("featureCodes_sv.txt", K::FeatureCode);
pub const HIERARCHY: DumpFile = DumpFile::zipped("hierarchy.zip", K::Hierarchy);
pub const SHAPES: DumpFile = DumpFile::zipped("shapes_all_low.zip", K::Shape).with_header();
pub const USER_TAGS: DumpFile = DumpFile::zipped("userTags.zip", K::UserTag);
pub const ADMIN_DIVISIONS: DumpFile = DumpFile::plain("admin1CodesASCII.txt", K::AdminDivision);
pub const ADMIN_SUBDIVISIONS: DumpFile = DumpFile::plain("admin2Codes.txt", K::AdminSubdivision);
pub const ADMIN_CODE_5: DumpFile = DumpFile::zipped("adminCode5.zip", K::AdminCode5);
pub const ALTERNATE_NAMES_DELETES: DumpFile =
    DumpFile::dated("alternateNamesDeletes-%s.txt", K::AlternateNameDelete);
pub const ALTERNATE_NAMES_MODIFICATIONS: DumpFile =
    DumpFile::dated("alternateNamesModifications-%s.txt", K::AlternateNameModification);
pub const DELETES: DumpFile = DumpFile::dated("deletes-%s.txt", K::GeonameDelete);
pub const MODIFICATIONS: DumpFile = DumpFile::dated("modifications-%s.txt", K::Geoname);

/// Every catalogued dump.
pub const ALL: &[DumpFile] = &[
    CITIES_500,
    CITIES_1000,
    CITIES_5000,
    CITIES_15000,
    ALL_COUNTRIES,
    NO_COUNTRY,
    ALTERNATE_NAMES,
    LANGUAGE_CODES,
    TIME_ZONES,
    COUNTRIES,
    FEATURE_CODES_BG,
    FEATURE_CODES_EN,
    FEATURE_CODES_NB,
    FEATURE_CODES_NN,
    FEATURE_CODES_NO,
    FEATURE_CODES_RU,
    FEATURE_CODES_SV,
    HIERARCHY,
    SHAPES,
    USER_TAGS,
    ADMIN_DIVISIONS,
    ADMIN_SUBDIVISIONS,
    ADMIN_CODE_5,
    ALTERNATE_NAMES_DELETES,
    ALTERNATE_NAMES_MODIFICATIONS,
    DELETES,
    MODIFICATIONS,
];

/// Look up a dump by file name, with or without its extension
/// (`cities5000`, `cities5000.zip`, `deletes-%s.txt`, `deletes`).
pub fn find(name: &str) -> Option<&'static DumpFile> {
    ALL.iter().find(|dump| {
        let full: &str = &dump.name;
        let stem = full.rsplit_once('.').map_or(full, |(stem, _)| stem);
        full == name || stem == name || stem.strip_suffix("-%s") == Some(name)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    #[test]
    fn archive_text_names() {
        assert_eq!(CITIES_5000.text_file_name(), "cities5000.txt");
        assert_eq!(NO_COUNTRY.text_file_name(), "null.txt");
        assert_eq!(TIME_ZONES.text_file_name(), "timeZones.txt");
        assert_eq!(SHAPES.text_file_name(), "shapes_all_low.txt");
    }

    #[test]
    fn date_token_substitution() {
        let date = Date::from_calendar_date(2024, Month::March, 5).unwrap();
        let deletes = DELETES.with_date(date);
        assert_eq!(deletes.name, "deletes-2024-03-05.txt");
        assert!(!deletes.needs_date());
        assert!(DELETES.needs_date());

        // undated files are untouched
        assert_eq!(CITIES_500.with_date(date), CITIES_500);
    }

    #[test]
    fn last_date_resolves_token() {
        let modifications = MODIFICATIONS.with_last_date();
        assert!(modifications.name.starts_with("modifications-20"));
        assert!(!modifications.needs_date());
    }

    #[test]
    fn lookup_by_name_or_stem() {
        assert_eq!(find("cities5000"), Some(&CITIES_5000));
        assert_eq!(find("timeZones.txt"), Some(&TIME_ZONES));
        assert_eq!(find("deletes"), Some(&DELETES));
        assert_eq!(find("cities42"), None);
    }
}
