use crate::error::{MalformedRecordError, ScopeError};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;

/// Sentinel scope name used by the selector and the `/all` endpoint.
pub const WORLDWIDE: &str = "worldwide";

/// Which aggregate to fetch: the worldwide total or a single country.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub enum Scope {
    #[default]
    Worldwide,
    /// A country code as given by the user (usually ISO2, e.g. `US`).
    Country(String),
}

impl Scope {
    /// Parse a selector value. `"worldwide"` (any case) maps to [`Scope::Worldwide`];
    /// anything else non-empty is taken as a country code.
    pub fn parse(s: &str) -> Result<Self, ScopeError> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ScopeError::Empty);
        }
        if s.eq_ignore_ascii_case(WORLDWIDE) {
            Ok(Scope::Worldwide)
        } else {
            Ok(Scope::Country(s.to_string()))
        }
    }

    pub fn is_worldwide(&self) -> bool {
        matches!(self, Scope::Worldwide)
    }

    pub fn code(&self) -> &str {
        match self {
            Scope::Worldwide => WORLDWIDE,
            Scope::Country(code) => code,
        }
    }
}

impl fmt::Display for Scope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl Serialize for Scope {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.code())
    }
}

/// Statistic highlighted by the map and chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKind {
    #[default]
    Cases,
    Recovered,
    Deaths,
}

impl StatKind {
    pub const ALL: [StatKind; 3] = [StatKind::Cases, StatKind::Recovered, StatKind::Deaths];

    pub fn as_str(&self) -> &'static str {
        match self {
            StatKind::Cases => "cases",
            StatKind::Recovered => "recovered",
            StatKind::Deaths => "deaths",
        }
    }

    /// Info box heading for this statistic.
    pub fn title(&self) -> &'static str {
        match self {
            StatKind::Cases => "Coronavirus Cases",
            StatKind::Recovered => "Recovered",
            StatKind::Deaths => "Deaths",
        }
    }

    /// Circle colour on the map.
    pub fn color_hex(&self) -> &'static str {
        match self {
            StatKind::Cases => "#CC1034",
            StatKind::Recovered => "#7dd71d",
            StatKind::Deaths => "#fb4443",
        }
    }

    /// Circle radius multiplier (metres per sqrt(count)).
    pub fn radius_multiplier(&self) -> f64 {
        match self {
            StatKind::Cases => 800.0,
            StatKind::Recovered => 1200.0,
            StatKind::Deaths => 2000.0,
        }
    }
}

impl fmt::Display for StatKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latitude/longitude pair used for map centring.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    pub const fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

/// Nested `countryInfo` object of the API.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawCountryInfo {
    pub iso2: Option<String>,
    pub lat: Option<f64>,
    pub long: Option<f64>,
}

/// Raw stats record as returned by `/all`, `/countries` and `/countries/{code}`.
/// Every field is optional here; the typed records decide what is required.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawStat {
    pub country: Option<String>,
    pub country_info: Option<RawCountryInfo>,
    pub cases: Option<u64>,
    pub today_cases: Option<u64>,
    pub deaths: Option<u64>,
    pub today_deaths: Option<u64>,
    pub recovered: Option<u64>,
    pub today_recovered: Option<u64>,
}

impl RawStat {
    fn iso_code(&self) -> Option<String> {
        self.country_info
            .as_ref()
            .and_then(|i| i.iso2.as_deref())
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    }

    fn center(&self) -> Option<LatLng> {
        let info = self.country_info.as_ref()?;
        Some(LatLng::new(info.lat?, info.long?))
    }
}

/// One row of the `/countries` list. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryStat {
    pub name: String,
    /// ISO2 code; a handful of entries (cruise ships) carry none.
    pub iso_code: Option<String>,
    pub cases: u64,
    pub today_cases: u64,
    pub deaths: u64,
    pub today_deaths: u64,
    pub recovered: u64,
    pub today_recovered: u64,
    pub lat: f64,
    pub long: f64,
}

impl CountryStat {
    pub fn value(&self, kind: StatKind) -> u64 {
        match kind {
            StatKind::Cases => self.cases,
            StatKind::Recovered => self.recovered,
            StatKind::Deaths => self.deaths,
        }
    }

    pub fn center(&self) -> LatLng {
        LatLng::new(self.lat, self.long)
    }
}

impl TryFrom<RawStat> for CountryStat {
    type Error = MalformedRecordError;

    fn try_from(raw: RawStat) -> Result<Self, Self::Error> {
        let iso_code = raw.iso_code();
        let center = raw.center();
        let name = raw
            .country
            .filter(|n| !n.trim().is_empty())
            .ok_or(MalformedRecordError::missing("country"))?;
        let cases = raw
            .cases
            .ok_or_else(|| MalformedRecordError::missing("cases").named(&name))?;
        let center = center.ok_or_else(|| MalformedRecordError::missing("countryInfo").named(&name))?;
        Ok(Self {
            name,
            iso_code,
            cases,
            today_cases: raw.today_cases.unwrap_or(0),
            deaths: raw.deaths.unwrap_or(0),
            today_deaths: raw.today_deaths.unwrap_or(0),
            recovered: raw.recovered.unwrap_or(0),
            today_recovered: raw.today_recovered.unwrap_or(0),
            lat: center.lat,
            long: center.lng,
        })
    }
}

/// Minimal `{name, value}` projection used by the country selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryOption {
    pub name: String,
    pub value: String,
}

/// Totals for one scope (worldwide or one country).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateStat {
    pub scope: Scope,
    pub name: Option<String>,
    pub iso_code: Option<String>,
    pub cases: u64,
    pub today_cases: u64,
    pub deaths: u64,
    pub today_deaths: u64,
    pub recovered: u64,
    pub today_recovered: u64,
    /// Present for country scopes; `/all` has no coordinates.
    pub center: Option<LatLng>,
}

impl AggregateStat {
    /// Build from a raw record. Returns the name of the first missing required field on failure.
    pub fn from_raw(scope: Scope, raw: RawStat) -> Result<Self, &'static str> {
        let cases = raw.cases.ok_or("cases")?;
        let center = raw.center();
        if !scope.is_worldwide() && center.is_none() {
            return Err("countryInfo");
        }
        Ok(Self {
            iso_code: raw.iso_code(),
            scope,
            name: raw.country,
            cases,
            today_cases: raw.today_cases.unwrap_or(0),
            deaths: raw.deaths.unwrap_or(0),
            today_deaths: raw.today_deaths.unwrap_or(0),
            recovered: raw.recovered.unwrap_or(0),
            today_recovered: raw.today_recovered.unwrap_or(0),
            center,
        })
    }

    pub fn total(&self, kind: StatKind) -> u64 {
        match kind {
            StatKind::Cases => self.cases,
            StatKind::Recovered => self.recovered,
            StatKind::Deaths => self.deaths,
        }
    }

    pub fn today(&self, kind: StatKind) -> u64 {
        match kind {
            StatKind::Cases => self.today_cases,
            StatKind::Recovered => self.today_recovered,
            StatKind::Deaths => self.today_deaths,
        }
    }
}

/// Raw `/historical/all` payload: cumulative counts keyed by `M/D/YY` dates.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RawTimeline {
    #[serde(default)]
    pub cases: BTreeMap<String, u64>,
    #[serde(default)]
    pub deaths: BTreeMap<String, u64>,
    #[serde(default)]
    pub recovered: BTreeMap<String, u64>,
}

/// Cumulative worldwide counts per day, ordered by date.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Timeline {
    pub cases: BTreeMap<NaiveDate, u64>,
    pub deaths: BTreeMap<NaiveDate, u64>,
    pub recovered: BTreeMap<NaiveDate, u64>,
}

impl Timeline {
    pub fn series(&self, kind: StatKind) -> &BTreeMap<NaiveDate, u64> {
        match kind {
            StatKind::Cases => &self.cases,
            StatKind::Recovered => &self.recovered,
            StatKind::Deaths => &self.deaths,
        }
    }
}

/// Date format used by the historical endpoint, e.g. `3/14/20`.
pub const TIMELINE_DATE_FORMAT: &str = "%m/%d/%y";

impl TryFrom<RawTimeline> for Timeline {
    type Error = chrono::ParseError;

    fn try_from(raw: RawTimeline) -> Result<Self, Self::Error> {
        fn parse(m: BTreeMap<String, u64>) -> Result<BTreeMap<NaiveDate, u64>, chrono::ParseError> {
            m.into_iter()
                .map(|(d, v)| NaiveDate::parse_from_str(&d, TIMELINE_DATE_FORMAT).map(|d| (d, v)))
                .collect()
        }
        Ok(Self {
            cases: parse(raw.cases)?,
            deaths: parse(raw.deaths)?,
            recovered: parse(raw.recovered)?,
        })
    }
}

/// One point of the "new per day" chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ChartPoint {
    pub date: NaiveDate,
    pub value: i64,
}
