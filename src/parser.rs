//! One entry point per dump family, on top of fetch → unzip → decode.

use tracing::debug;

use crate::catalog::{self, DumpFile};
use crate::error::Result;
use crate::io::{FetchSource, Fetcher};
use crate::schema::{
    AdminCode5, AdminDivision, AdminSubdivision, AlternateName, AlternateNameDelete,
    AlternateNameModification, Country, FeatureCode, Geoname, GeonameDelete, Hierarchy, Language,
    Record, Shape, TimeZone, UserTag,
};
use crate::stream::{self, RowFormat, Rows};
use crate::zip::{self, TextStream};

/// Decodes catalogued dumps from one fetch source.
///
/// Each call opens a fresh stream; nothing is cached between calls.
pub struct GeoNames {
    source: FetchSource,
    fetcher: Fetcher,
}

impl GeoNames {
    pub fn new(source: FetchSource, fetcher: Fetcher) -> Self {
        Self { source, fetcher }
    }

    pub fn source(&self) -> FetchSource {
        self.source
    }

    pub fn fetcher(&self) -> &Fetcher {
        &self.fetcher
    }

    /// Open `dump` as a lazy record iterator.
    pub fn rows<T: Record>(&self, dump: &DumpFile) -> Result<Rows<TextStream, T>> {
        let (text, format) = self.open_text(dump)?;
        Ok(Rows::new(text, format))
    }

    /// Decode every row of `dump` as `T`, calling `handler` once per record.
    pub fn parse<T, F>(&self, dump: &DumpFile, handler: F) -> Result<()>
    where
        T: Record,
        F: FnMut(T) -> anyhow::Result<()>,
    {
        let (text, format) = self.open_text(dump)?;
        stream::decode(text, format, handler)
    }

    /// Fetch and unpack `dump`. Delta files whose date token is still
    /// unresolved use yesterday's date.
    fn open_text(&self, dump: &DumpFile) -> Result<(TextStream, RowFormat)> {
        let dump = if dump.needs_date() {
            dump.with_last_date()
        } else {
            dump.clone()
        };
        let stream = self.fetcher.open(self.source, &dump)?;
        debug!(dump = %dump, location = %stream.location(), "decoding dump");
        let text = zip::normalize(stream, &dump)?;
        Ok((text, RowFormat::from(&dump)))
    }

    /// `allCountries`, `citiesNNN`, `no-country` or a modifications file.
    pub fn geonames<F>(&self, dump: &DumpFile, handler: F) -> Result<()>
    where
        F: FnMut(Geoname) -> anyhow::Result<()>,
    {
        self.parse(dump, handler)
    }

    pub fn alternate_names<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(AlternateName) -> anyhow::Result<()>,
    {
        self.parse(&catalog::ALTERNATE_NAMES, handler)
    }

    pub fn languages<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(Language) -> anyhow::Result<()>,
    {
        self.parse(&catalog::LANGUAGE_CODES, handler)
    }

    pub fn time_zones<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(TimeZone) -> anyhow::Result<()>,
    {
        self.parse(&catalog::TIME_ZONES, handler)
    }

    pub fn countries<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(Country) -> anyhow::Result<()>,
    {
        self.parse(&catalog::COUNTRIES, handler)
    }

    /// One of the `featureCodes_xx.txt` translations.
    pub fn feature_codes<F>(&self, dump: &DumpFile, handler: F) -> Result<()>
    where
        F: FnMut(FeatureCode) -> anyhow::Result<()>,
    {
        self.parse(dump, handler)
    }

    pub fn hierarchy<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(Hierarchy) -> anyhow::Result<()>,
    {
        self.parse(&catalog::HIERARCHY, handler)
    }

    pub fn shapes<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(Shape) -> anyhow::Result<()>,
    {
        self.parse(&catalog::SHAPES, handler)
    }

    pub fn user_tags<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(UserTag) -> anyhow::Result<()>,
    {
        self.parse(&catalog::USER_TAGS, handler)
    }

    pub fn admin_divisions<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(AdminDivision) -> anyhow::Result<()>,
    {
        self.parse(&catalog::ADMIN_DIVISIONS, handler)
    }

    pub fn admin_subdivisions<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(AdminSubdivision) -> anyhow::Result<()>,
    {
        self.parse(&catalog::ADMIN_SUBDIVISIONS, handler)
    }

    pub fn admin_codes_5<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(AdminCode5) -> anyhow::Result<()>,
    {
        self.parse(&catalog::ADMIN_CODE_5, handler)
    }

    /// Latest `alternateNamesDeletes-<date>.txt`.
    pub fn alternate_name_deletes<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(AlternateNameDelete) -> anyhow::Result<()>,
    {
        self.parse(&catalog::ALTERNATE_NAMES_DELETES.with_last_date(), handler)
    }

    /// Latest `alternateNamesModifications-<date>.txt`.
    pub fn alternate_name_modifications<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(AlternateNameModification) -> anyhow::Result<()>,
    {
        self.parse(&catalog::ALTERNATE_NAMES_MODIFICATIONS.with_last_date(), handler)
    }

    /// Latest `deletes-<date>.txt`.
    pub fn deletes<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(GeonameDelete) -> anyhow::Result<()>,
    {
        self.parse(&catalog::DELETES.with_last_date(), handler)
    }

    /// Latest `modifications-<date>.txt`.
    pub fn modifications<F>(&self, handler: F) -> Result<()>
    where
        F: FnMut(Geoname) -> anyhow::Result<()>,
    {
        self.parse(&catalog::MODIFICATIONS.with_last_date(), handler)
    }
}
