use std::fmt;
use std::str::FromStr;

use time::Date;

use super::FieldKind::{Code, Date as DateKind, Flag, Float, Integer, List, Text};
use super::{
    Columns, Field, FieldError, Record, render_date, render_flag, render_list, render_opt,
};

/// Top-level feature class of a geoname (`A`, `H`, `L`, `P`, `R`, `S`, `T`, `U`, `V`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FeatureClass {
    AdministrativeBoundary,
    Hydrographic,
    Area,
    PopulatedPlace,
    RoadRailroad,
    Spot,
    Hypsographic,
    Undersea,
    Vegetation,
}

impl FeatureClass {
    pub fn code(&self) -> char {
        match self {
            FeatureClass::AdministrativeBoundary => 'A',
            FeatureClass::Hydrographic => 'H',
            FeatureClass::Area => 'L',
            FeatureClass::PopulatedPlace => 'P',
            FeatureClass::RoadRailroad => 'R',
            FeatureClass::Spot => 'S',
            FeatureClass::Hypsographic => 'T',
            FeatureClass::Undersea => 'U',
            FeatureClass::Vegetation => 'V',
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            FeatureClass::AdministrativeBoundary => "country, state, region",
            FeatureClass::Hydrographic => "stream, lake",
            FeatureClass::Area => "parks, area",
            FeatureClass::PopulatedPlace => "city, village",
            FeatureClass::RoadRailroad => "road, railroad",
            FeatureClass::Spot => "spot, building, farm",
            FeatureClass::Hypsographic => "mountain, hill, rock",
            FeatureClass::Undersea => "undersea",
            FeatureClass::Vegetation => "forest, heath",
        }
    }
}

impl FromStr for FeatureClass {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(FeatureClass::AdministrativeBoundary),
            "H" => Ok(FeatureClass::Hydrographic),
            "L" => Ok(FeatureClass::Area),
            "P" => Ok(FeatureClass::PopulatedPlace),
            "R" => Ok(FeatureClass::RoadRailroad),
            "S" => Ok(FeatureClass::Spot),
            "T" => Ok(FeatureClass::Hypsographic),
            "U" => Ok(FeatureClass::Undersea),
            "V" => Ok(FeatureClass::Vegetation),
            other => Err(format!("unknown feature class {other:?}")),
        }
    }
}

impl fmt::Display for FeatureClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Main geoname table row (`allCountries.txt`, `citiesNNN.txt`, `modifications-*.txt`).
#[derive(Debug, Clone, PartialEq)]
pub struct Geoname {
    pub geoname_id: u64,
    pub name: String,
    pub ascii_name: Option<String>,
    pub alternate_names: Vec<String>,
    pub latitude: f64,
    pub longitude: f64,
    pub feature_class: Option<FeatureClass>,
    pub feature_code: Option<String>,
    pub country_code: Option<String>,
    pub cc2: Vec<String>,
    pub admin1_code: Option<String>,
    pub admin2_code: Option<String>,
    pub admin3_code: Option<String>,
    pub admin4_code: Option<String>,
    pub population: u64,
    /// Elevation in meters.
    pub elevation: Option<i32>,
    /// Digital elevation model, srtm3 or gtopo30.
    pub dem: i32,
    pub timezone: Option<String>,
    pub modification_date: Date,
}

impl Record for Geoname {
    const SCHEMA: &'static [Field] = &[
        Field::required("geonameid", Integer),
        Field::required("name", Text),
        Field::optional("asciiname", Text),
        Field::optional("alternatenames", List),
        Field::required("latitude", Float),
        Field::required("longitude", Float),
        Field::optional("feature class", Code),
        Field::optional("feature code", Text),
        Field::optional("country code", Text),
        Field::optional("cc2", List),
        Field::optional("admin1 code", Text),
        Field::optional("admin2 code", Text),
        Field::optional("admin3 code", Text),
        Field::optional("admin4 code", Text),
        Field::required("population", Integer),
        Field::optional("elevation", Integer),
        Field::required("dem", Integer),
        Field::optional("timezone", Text),
        Field::required("modification date", DateKind),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            geoname_id: c.parse(0)?,
            name: c.text(1)?,
            ascii_name: c.opt_text(2)?,
            alternate_names: c.list(3)?,
            latitude: c.parse(4)?,
            longitude: c.parse(5)?,
            feature_class: c.opt_parse(6)?,
            feature_code: c.opt_text(7)?,
            country_code: c.opt_text(8)?,
            cc2: c.list(9)?,
            admin1_code: c.opt_text(10)?,
            admin2_code: c.opt_text(11)?,
            admin3_code: c.opt_text(12)?,
            admin4_code: c.opt_text(13)?,
            population: c.parse(14)?,
            elevation: c.opt_parse(15)?,
            dem: c.parse(16)?,
            timezone: c.opt_text(17)?,
            modification_date: c.date(18)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.geoname_id.to_string(),
            self.name.clone(),
            render_opt(&self.ascii_name),
            render_list(&self.alternate_names),
            self.latitude.to_string(),
            self.longitude.to_string(),
            render_opt(&self.feature_class),
            render_opt(&self.feature_code),
            render_opt(&self.country_code),
            render_list(&self.cc2),
            render_opt(&self.admin1_code),
            render_opt(&self.admin2_code),
            render_opt(&self.admin3_code),
            render_opt(&self.admin4_code),
            self.population.to_string(),
            render_opt(&self.elevation),
            self.dem.to_string(),
            render_opt(&self.timezone),
            render_date(&self.modification_date),
        ]
    }
}

/// `alternateNamesV2.txt` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateName {
    pub alternate_name_id: u64,
    pub geoname_id: u64,
    /// ISO 639 code, or a pseudo code such as `post`, `link`, `iata`.
    pub iso_language: Option<String>,
    pub alternate_name: String,
    pub is_preferred_name: bool,
    pub is_short_name: bool,
    pub is_colloquial: bool,
    pub is_historic: bool,
    pub from: Option<String>,
    pub to: Option<String>,
}

/// Rows of `alternateNamesModifications-*.txt` share the full alternate name layout.
pub type AlternateNameModification = AlternateName;

impl Record for AlternateName {
    const SCHEMA: &'static [Field] = &[
        Field::required("alternateNameId", Integer),
        Field::required("geonameid", Integer),
        Field::optional("isolanguage", Text),
        Field::required("alternate name", Text),
        Field::optional("isPreferredName", Flag),
        Field::optional("isShortName", Flag),
        Field::optional("isColloquial", Flag),
        Field::optional("isHistoric", Flag),
        Field::optional("from", Text),
        Field::optional("to", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            alternate_name_id: c.parse(0)?,
            geoname_id: c.parse(1)?,
            iso_language: c.opt_text(2)?,
            alternate_name: c.text(3)?,
            is_preferred_name: c.flag(4)?,
            is_short_name: c.flag(5)?,
            is_colloquial: c.flag(6)?,
            is_historic: c.flag(7)?,
            from: c.opt_text(8)?,
            to: c.opt_text(9)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.alternate_name_id.to_string(),
            self.geoname_id.to_string(),
            render_opt(&self.iso_language),
            self.alternate_name.clone(),
            render_flag(self.is_preferred_name),
            render_flag(self.is_short_name),
            render_flag(self.is_colloquial),
            render_flag(self.is_historic),
            render_opt(&self.from),
            render_opt(&self.to),
        ]
    }
}

/// `iso-languagecodes.txt` row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Language {
    pub iso_639_3: String,
    pub iso_639_2: Option<String>,
    pub iso_639_1: Option<String>,
    pub name: String,
}

impl Record for Language {
    const SCHEMA: &'static [Field] = &[
        Field::required("ISO 639-3", Text),
        Field::optional("ISO 639-2", Text),
        Field::optional("ISO 639-1", Text),
        Field::required("Language Name", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            iso_639_3: c.text(0)?,
            iso_639_2: c.opt_text(1)?,
            iso_639_1: c.opt_text(2)?,
            name: c.text(3)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.iso_639_3.clone(),
            render_opt(&self.iso_639_2),
            render_opt(&self.iso_639_1),
            self.name.clone(),
        ]
    }
}

/// `timeZones.txt` row. Offsets are in hours.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeZone {
    pub country_code: String,
    pub time_zone_id: String,
    /// GMT offset on 1st of January.
    pub gmt_offset: f64,
    /// DST offset on 1st of July.
    pub dst_offset: f64,
    /// Offset independent of DST.
    pub raw_offset: f64,
}

impl Record for TimeZone {
    const SCHEMA: &'static [Field] = &[
        Field::required("CountryCode", Text),
        Field::required("TimeZoneId", Text),
        Field::required("GMT offset", Float),
        Field::required("DST offset", Float),
        Field::required("rawOffset", Float),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            country_code: c.text(0)?,
            time_zone_id: c.text(1)?,
            gmt_offset: c.parse(2)?,
            dst_offset: c.parse(3)?,
            raw_offset: c.parse(4)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.country_code.clone(),
            self.time_zone_id.clone(),
            self.gmt_offset.to_string(),
            self.dst_offset.to_string(),
            self.raw_offset.to_string(),
        ]
    }
}

/// `countryInfo.txt` row.
#[derive(Debug, Clone, PartialEq)]
pub struct Country {
    pub iso: String,
    pub iso3: String,
    pub iso_numeric: u16,
    pub fips: Option<String>,
    pub name: String,
    pub capital: Option<String>,
    /// Square kilometers.
    pub area: f64,
    pub population: u64,
    pub continent: String,
    pub tld: Option<String>,
    pub currency_code: Option<String>,
    pub currency_name: Option<String>,
    pub phone: Option<String>,
    pub postal_code_format: Option<String>,
    pub postal_code_regex: Option<String>,
    pub languages: Vec<String>,
    pub geoname_id: u64,
    pub neighbours: Vec<String>,
    pub equivalent_fips_code: Option<String>,
}

impl Record for Country {
    const SCHEMA: &'static [Field] = &[
        Field::required("ISO", Text),
        Field::required("ISO3", Text),
        Field::required("ISO-Numeric", Integer),
        Field::optional("fips", Text),
        Field::required("Country", Text),
        Field::optional("Capital", Text),
        Field::required("Area(in sq km)", Float),
        Field::required("Population", Integer),
        Field::required("Continent", Text),
        Field::optional("tld", Text),
        Field::optional("CurrencyCode", Text),
        Field::optional("CurrencyName", Text),
        Field::optional("Phone", Text),
        Field::optional("Postal Code Format", Text),
        Field::optional("Postal Code Regex", Text),
        Field::optional("Languages", List),
        Field::required("geonameid", Integer),
        Field::optional("neighbours", List),
        Field::optional("EquivalentFipsCode", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            iso: c.text(0)?,
            iso3: c.text(1)?,
            iso_numeric: c.parse(2)?,
            fips: c.opt_text(3)?,
            name: c.text(4)?,
            capital: c.opt_text(5)?,
            area: c.parse(6)?,
            population: c.parse(7)?,
            continent: c.text(8)?,
            tld: c.opt_text(9)?,
            currency_code: c.opt_text(10)?,
            currency_name: c.opt_text(11)?,
            phone: c.opt_text(12)?,
            postal_code_format: c.opt_text(13)?,
            postal_code_regex: c.opt_text(14)?,
            languages: c.list(15)?,
            geoname_id: c.parse(16)?,
            neighbours: c.list(17)?,
            equivalent_fips_code: c.opt_text(18)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.iso.clone(),
            self.iso3.clone(),
            format!("{:03}", self.iso_numeric),
            render_opt(&self.fips),
            self.name.clone(),
            render_opt(&self.capital),
            self.area.to_string(),
            self.population.to_string(),
            self.continent.clone(),
            render_opt(&self.tld),
            render_opt(&self.currency_code),
            render_opt(&self.currency_name),
            render_opt(&self.phone),
            render_opt(&self.postal_code_format),
            render_opt(&self.postal_code_regex),
            render_list(&self.languages),
            self.geoname_id.to_string(),
            render_list(&self.neighbours),
            render_opt(&self.equivalent_fips_code),
        ]
    }
}

/// `featureCodes_xx.txt` row. `code` is `<class>.<code>`, e.g. `P.PPLC`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureCode {
    pub code: String,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl FeatureCode {
    /// Class prefix of [`FeatureCode::code`], if it has one.
    pub fn class(&self) -> Option<FeatureClass> {
        self.code.split_once('.')?.0.parse().ok()
    }
}

impl Record for FeatureCode {
    const SCHEMA: &'static [Field] = &[
        Field::required("code", Text),
        Field::optional("name", Text),
        Field::optional("description", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            code: c.text(0)?,
            name: c.opt_text(1)?,
            description: c.opt_text(2)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            render_opt(&self.name),
            render_opt(&self.description),
        ]
    }
}

/// Parent/child edge from `hierarchy.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hierarchy {
    pub parent_id: u64,
    pub child_id: u64,
    /// `ADM` for the administrative hierarchy, other values are user defined.
    pub kind: Option<String>,
}

impl Record for Hierarchy {
    const SCHEMA: &'static [Field] = &[
        Field::required("parentId", Integer),
        Field::required("childId", Integer),
        Field::optional("type", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            parent_id: c.parse(0)?,
            child_id: c.parse(1)?,
            kind: c.opt_text(2)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.parent_id.to_string(),
            self.child_id.to_string(),
            render_opt(&self.kind),
        ]
    }
}

/// Country outline from `shapes_all_low.txt`; the geometry stays raw GeoJSON.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Shape {
    pub geoname_id: u64,
    pub geo_json: String,
}

impl Record for Shape {
    const SCHEMA: &'static [Field] = &[
        Field::required("geoNameId", Integer),
        Field::required("geoJSON", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            geoname_id: c.parse(0)?,
            geo_json: c.text(1)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![self.geoname_id.to_string(), self.geo_json.clone()]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserTag {
    pub geoname_id: u64,
    pub tag: String,
}

impl Record for UserTag {
    const SCHEMA: &'static [Field] = &[
        Field::required("geonameid", Integer),
        Field::required("tag", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            geoname_id: c.parse(0)?,
            tag: c.text(1)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![self.geoname_id.to_string(), self.tag.clone()]
    }
}

/// `admin1CodesASCII.txt` row. `code` is `<country>.<admin1>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminDivision {
    pub code: String,
    pub name: String,
    pub ascii_name: Option<String>,
    pub geoname_id: u64,
}

/// `admin2Codes.txt` uses the same columns, with `<country>.<admin1>.<admin2>` codes.
pub type AdminSubdivision = AdminDivision;

impl Record for AdminDivision {
    const SCHEMA: &'static [Field] = &[
        Field::required("code", Text),
        Field::required("name", Text),
        Field::optional("name ascii", Text),
        Field::required("geonameid", Integer),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            code: c.text(0)?,
            name: c.text(1)?,
            ascii_name: c.opt_text(2)?,
            geoname_id: c.parse(3)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.code.clone(),
            self.name.clone(),
            render_opt(&self.ascii_name),
            self.geoname_id.to_string(),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdminCode5 {
    pub geoname_id: u64,
    pub adm5_code: String,
}

impl Record for AdminCode5 {
    const SCHEMA: &'static [Field] = &[
        Field::required("geonameid", Integer),
        Field::required("adm5code", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            geoname_id: c.parse(0)?,
            adm5_code: c.text(1)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![self.geoname_id.to_string(), self.adm5_code.clone()]
    }
}

/// Marker from `alternateNamesDeletes-*.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AlternateNameDelete {
    pub alternate_name_id: u64,
    pub geoname_id: u64,
    pub comment: Option<String>,
}

impl Record for AlternateNameDelete {
    const SCHEMA: &'static [Field] = &[
        Field::required("alternateNameId", Integer),
        Field::required("geonameId", Integer),
        Field::optional("comment", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            alternate_name_id: c.parse(0)?,
            geoname_id: c.parse(1)?,
            comment: c.opt_text(2)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.alternate_name_id.to_string(),
            self.geoname_id.to_string(),
            render_opt(&self.comment),
        ]
    }
}

/// Marker from `deletes-*.txt`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeonameDelete {
    pub geoname_id: u64,
    pub name: String,
    pub comment: Option<String>,
}

impl Record for GeonameDelete {
    const SCHEMA: &'static [Field] = &[
        Field::required("geonameid", Integer),
        Field::required("name", Text),
        Field::optional("comment", Text),
    ];

    fn from_columns(c: &Columns<'_>) -> Result<Self, FieldError> {
        Ok(Self {
            geoname_id: c.parse(0)?,
            name: c.text(1)?,
            comment: c.opt_text(2)?,
        })
    }

    fn to_columns(&self) -> Vec<String> {
        vec![
            self.geoname_id.to_string(),
            self.name.clone(),
            render_opt(&self.comment),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::Month;

    const PARIS: &str = "2988507\tParis\tParis\tLutece,Paname\t48.85341\t2.3488\tP\tPPLC\tFR\t\t11\t75\t751\t75056\t2138551\t\t42\tEurope/Paris\t2024-09-18";

    #[test]
    fn geoname_binds_every_column() {
        let paris = Geoname::from_line(PARIS).unwrap();
        assert_eq!(paris.geoname_id, 2988507);
        assert_eq!(paris.name, "Paris");
        assert_eq!(paris.alternate_names, vec!["Lutece", "Paname"]);
        assert_eq!(paris.latitude, 48.85341);
        assert_eq!(paris.feature_class, Some(FeatureClass::PopulatedPlace));
        assert_eq!(paris.feature_code.as_deref(), Some("PPLC"));
        assert!(paris.cc2.is_empty());
        assert_eq!(paris.admin4_code.as_deref(), Some("75056"));
        assert_eq!(paris.population, 2138551);
        assert_eq!(paris.elevation, None);
        assert_eq!(paris.dem, 42);
        assert_eq!(
            paris.modification_date,
            Date::from_calendar_date(2024, Month::September, 18).unwrap()
        );
    }

    #[test]
    fn geoname_renders_back_to_the_same_line() {
        let paris = Geoname::from_line(PARIS).unwrap();
        assert_eq!(paris.to_line(), PARIS);
    }

    #[test]
    fn geoname_rejects_missing_modification_date() {
        let line = PARIS.rsplit_once('\t').unwrap().0.to_string() + "\t";
        assert_eq!(
            Geoname::from_line(&line).unwrap_err(),
            FieldError::Missing {
                index: 18,
                name: "modification date"
            }
        );
    }

    #[test]
    fn geoname_rejects_unknown_feature_class() {
        let line = PARIS.replace("\tP\tPPLC", "\tQ\tPPLC");
        assert!(matches!(
            Geoname::from_line(&line),
            Err(FieldError::Invalid {
                index: 6,
                name: "feature class",
                ..
            })
        ));
    }

    #[test]
    fn alternate_name_flags_round_trip() {
        let line = "1557\t2988507\tfr\tParis\t1\t\t\t\t\t";
        let name = AlternateName::from_line(line).unwrap();
        assert!(name.is_preferred_name);
        assert!(!name.is_historic);
        assert_eq!(name.iso_language.as_deref(), Some("fr"));
        assert_eq!(name.from, None);
        assert_eq!(name.to_line(), line);
    }

    #[test]
    fn country_keeps_zero_padded_numeric_code() {
        let line = "AD\tAND\t020\tAN\tAndorra\tAndorra la Vella\t468\t77006\tEU\t.ad\tEUR\tEuro\t376\tAD###\t^(?:AD)*(\\d{3})$\tca\t3041565\tES,FR\t";
        let andorra = Country::from_line(line).unwrap();
        assert_eq!(andorra.iso_numeric, 20);
        assert_eq!(andorra.neighbours, vec!["ES", "FR"]);
        assert_eq!(andorra.equivalent_fips_code, None);
        assert_eq!(andorra.to_line(), line);
    }

    #[test]
    fn feature_code_exposes_its_class() {
        let code = FeatureCode::from_line("P.PPLC\tcapital of a political entity\t").unwrap();
        assert_eq!(code.class(), Some(FeatureClass::PopulatedPlace));
        assert_eq!(code.description, None);
    }

    #[test]
    fn time_zone_parses_fractional_offsets() {
        let tz = TimeZone::from_line("IN\tAsia/Kolkata\t5.5\t5.5\t5.5").unwrap();
        assert_eq!(tz.raw_offset, 5.5);
        assert!(matches!(
            TimeZone::from_line("IN\tAsia/Kolkata\tfive\t5.5\t5.5"),
            Err(FieldError::Invalid { index: 2, .. })
        ));
    }

    #[test]
    fn small_tables_round_trip() {
        for line in ["2988507\t2968815\tADM", "6255148\t\t"] {
            match Hierarchy::from_line(line) {
                Ok(edge) => assert_eq!(edge.to_line(), line),
                Err(err) => assert_eq!(
                    err,
                    FieldError::Missing {
                        index: 1,
                        name: "childId"
                    }
                ),
            }
        }
        let admin = AdminDivision::from_line("FR.11\tÎle-de-France\tIle-de-France\t3012874").unwrap();
        assert_eq!(admin.to_line(), "FR.11\tÎle-de-France\tIle-de-France\t3012874");
        let delete = GeonameDelete::from_line("123\tOld Mill\tduplicate").unwrap();
        assert_eq!(delete.comment.as_deref(), Some("duplicate"));
    }

    #[test]
    fn header_follows_schema_order() {
        assert_eq!(UserTag::header(), vec!["geonameid", "tag"]);
        assert_eq!(Geoname::header().len(), 19);
    }
}
