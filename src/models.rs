//! Core data structures for decoded METAR and TAF reports.
//!
//! Defines the token and group types produced by the tokenizer, the typed
//! weather groups (wind, visibility, clouds, phenomena, temperature,
//! pressure), the decoded report and forecast records, and the flight
//! category scale.

use crate::constants::{
    CARDINAL_POINTS, CLOUD_HEIGHT_MULTIPLIER, INHG_PER_HPA, KILOMETRES_PER_STATUTE_MILE,
    KMH_PER_KNOT, KNOTS_PER_MPS, METRES_PER_FOOT, STATUTE_MILES_PER_METRE,
    UNRESTRICTED_VISIBILITY_SM,
};
use chrono::{DateTime, Datelike, Duration, Months, NaiveDate, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Tokens and Groups
// =============================================================================

/// A run of non-whitespace text from a raw report and its byte offset.
///
/// A token normally covers one whitespace-delimited word. A whole-plus-fraction
/// visibility (`1 1/2SM`) is merged into a single token covering both words.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Token<'a> {
    pub text: &'a str,
    pub offset: usize,
}

impl Token<'_> {
    /// Byte offset one past the end of the token
    pub fn end(&self) -> usize {
        self.offset + self.text.len()
    }
}

/// Category of a classified token
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GroupKind {
    ReportType,
    StationIdentifier,
    StationTime,
    ValidityWindow,
    Modifier,
    Wind,
    WindVariation,
    Visibility,
    RunwayVisualRange,
    CloudLayer,
    SkyClear,
    WeatherPhenomenon,
    NoSignificantWeather,
    TemperatureDewpoint,
    TemperatureExtreme,
    Pressure,
    Cavok,
    ChangeIndicator,
    TrendTime,
    Remark,
    Unrecognized,
}

/// A decoded group: the kind together with its typed payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Group {
    ReportType(ReportType),
    StationIdentifier(String),
    StationTime(DayTime),
    ValidityWindow(ValidityWindow),
    Modifier(ReportModifier),
    Wind(WindGroup),
    WindVariation(WindVariation),
    Visibility(Visibility),
    RunwayVisualRange(RunwayVisualRange),
    CloudLayer(CloudLayer),
    SkyClear(SkyClear),
    WeatherPhenomenon(WeatherPhenomenon),
    NoSignificantWeather,
    TemperatureDewpoint(TemperatureDewpoint),
    TemperatureExtreme(TemperatureExtreme),
    Pressure(Pressure),
    Cavok,
    ChangeIndicator(ChangeIndicator),
    TrendTime(TrendTime),
    Remark,
    Unrecognized,
}

impl Group {
    pub fn kind(&self) -> GroupKind {
        match self {
            Group::ReportType(_) => GroupKind::ReportType,
            Group::StationIdentifier(_) => GroupKind::StationIdentifier,
            Group::StationTime(_) => GroupKind::StationTime,
            Group::ValidityWindow(_) => GroupKind::ValidityWindow,
            Group::Modifier(_) => GroupKind::Modifier,
            Group::Wind(_) => GroupKind::Wind,
            Group::WindVariation(_) => GroupKind::WindVariation,
            Group::Visibility(_) => GroupKind::Visibility,
            Group::RunwayVisualRange(_) => GroupKind::RunwayVisualRange,
            Group::CloudLayer(_) => GroupKind::CloudLayer,
            Group::SkyClear(_) => GroupKind::SkyClear,
            Group::WeatherPhenomenon(_) => GroupKind::WeatherPhenomenon,
            Group::NoSignificantWeather => GroupKind::NoSignificantWeather,
            Group::TemperatureDewpoint(_) => GroupKind::TemperatureDewpoint,
            Group::TemperatureExtreme(_) => GroupKind::TemperatureExtreme,
            Group::Pressure(_) => GroupKind::Pressure,
            Group::Cavok => GroupKind::Cavok,
            Group::ChangeIndicator(_) => GroupKind::ChangeIndicator,
            Group::TrendTime(_) => GroupKind::TrendTime,
            Group::Remark => GroupKind::Remark,
            Group::Unrecognized => GroupKind::Unrecognized,
        }
    }
}

/// A token paired with the single group it was classified as
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassifiedToken<'a> {
    pub token: Token<'a>,
    pub group: Group,
}

impl ClassifiedToken<'_> {
    pub fn kind(&self) -> GroupKind {
        self.group.kind()
    }
}

// =============================================================================
// Report Header Types
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportType {
    Metar,
    Speci,
    Taf,
}

impl ReportType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "METAR" => Some(ReportType::Metar),
            "SPECI" => Some(ReportType::Speci),
            "TAF" => Some(ReportType::Taf),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReportModifier {
    /// Fully automated observation
    Auto,
    /// Corrected report
    Corrected,
    /// Amended forecast
    Amended,
    /// Missing report
    Nil,
}

impl ReportModifier {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "AUTO" => Some(ReportModifier::Auto),
            "COR" => Some(ReportModifier::Corrected),
            "AMD" => Some(ReportModifier::Amended),
            "NIL" => Some(ReportModifier::Nil),
            _ => None,
        }
    }
}

// =============================================================================
// Times
// =============================================================================

/// Day of month, hour and minute (UTC), as in `151200Z` or `FM151430`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayTime {
    pub day: u8,
    pub hour: u8,
    pub minute: u8,
}

impl DayTime {
    /// Resolve to an absolute UTC timestamp near `reference`
    pub fn resolve(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        resolve_day_time(self.day, self.hour, self.minute, reference)
    }
}

impl fmt::Display for DayTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}{:02}Z", self.day, self.hour, self.minute)
    }
}

/// Day of month and hour (UTC), one half of a `ddHH/ddHH` range
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct DayHour {
    pub day: u8,
    /// 0..=24; hour 24 denotes the end of `day`
    pub hour: u8,
}

impl DayHour {
    /// Resolve to an absolute UTC timestamp near `reference`
    pub fn resolve(&self, reference: DateTime<Utc>) -> Option<DateTime<Utc>> {
        resolve_day_time(self.day, self.hour, 0, reference)
    }
}

impl fmt::Display for DayHour {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02}{:02}", self.day, self.hour)
    }
}

/// Validity range `ddHH/ddHH`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ValidityWindow {
    pub start: DayHour,
    pub end: DayHour,
}

impl ValidityWindow {
    /// Resolve both ends against `reference`
    pub fn resolve(&self, reference: DateTime<Utc>) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        Some((self.start.resolve(reference)?, self.end.resolve(reference)?))
    }
}

impl fmt::Display for ValidityWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.start, self.end)
    }
}

/// Resolve a day/hour/minute to the candidate in the previous, current or
/// next month of `reference` that lies closest to it.
fn resolve_day_time(
    day: u8,
    hour: u8,
    minute: u8,
    reference: DateTime<Utc>,
) -> Option<DateTime<Utc>> {
    if hour > 24 || minute > 59 || (hour == 24 && minute != 0) {
        return None;
    }

    let month_start = reference.date_naive().with_day(1)?;
    let candidates = [
        month_start.checked_sub_months(Months::new(1)),
        Some(month_start),
        month_start.checked_add_months(Months::new(1)),
    ];

    candidates
        .into_iter()
        .flatten()
        .filter_map(|first| NaiveDate::from_ymd_opt(first.year(), first.month(), u32::from(day)))
        .filter_map(|date| date.and_hms_opt(0, 0, 0))
        .map(|midnight| {
            Utc.from_utc_datetime(&midnight)
                + Duration::hours(i64::from(hour))
                + Duration::minutes(i64::from(minute))
        })
        .min_by_key(|candidate| (*candidate - reference).num_seconds().abs())
}

// =============================================================================
// Wind
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WindDirection {
    Degrees(u16),
    Variable,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpeedUnit {
    Knots,
    MetresPerSecond,
}

impl SpeedUnit {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "KT" => Some(SpeedUnit::Knots),
            "MPS" => Some(SpeedUnit::MetresPerSecond),
            _ => None,
        }
    }

    fn to_knots(self, value: u16) -> f64 {
        match self {
            SpeedUnit::Knots => f64::from(value),
            SpeedUnit::MetresPerSecond => f64::from(value) * KNOTS_PER_MPS,
        }
    }
}

/// Surface wind group such as `28012KT` or `VRB03G15KT`
///
/// A gust lower than the sustained speed is kept as reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WindGroup {
    pub direction: WindDirection,
    pub speed: u16,
    pub gust: Option<u16>,
    pub unit: SpeedUnit,
}

impl WindGroup {
    /// `00000KT`
    pub fn is_calm(&self) -> bool {
        self.speed == 0 && self.direction == WindDirection::Degrees(0) && self.gust.is_none()
    }

    pub fn speed_knots(&self) -> f64 {
        self.unit.to_knots(self.speed)
    }

    pub fn gust_knots(&self) -> Option<f64> {
        self.gust.map(|gust| self.unit.to_knots(gust))
    }

    pub fn speed_kmh(&self) -> f64 {
        self.speed_knots() * KMH_PER_KNOT
    }

    pub fn speed_mps(&self) -> f64 {
        match self.unit {
            SpeedUnit::MetresPerSecond => f64::from(self.speed),
            SpeedUnit::Knots => self.speed_knots() / KNOTS_PER_MPS,
        }
    }

    /// 16-point compass name of the direction the wind blows from
    pub fn cardinal(&self) -> Option<&'static str> {
        match self.direction {
            WindDirection::Degrees(degrees) => Some(cardinal_point(degrees)),
            WindDirection::Variable => None,
        }
    }

    /// Whether the gust (if any) exceeds the sustained speed
    pub fn gust_is_consistent(&self) -> bool {
        self.gust.is_none_or(|gust| gust > self.speed)
    }
}

/// 16-point compass name for a direction in degrees
pub fn cardinal_point(degrees: u16) -> &'static str {
    let index = (f64::from(degrees) / 22.5).round() as usize % CARDINAL_POINTS.len();
    CARDINAL_POINTS[index]
}

/// Variable wind direction range `dddVddd`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct WindVariation {
    pub from: u16,
    pub to: u16,
}

// =============================================================================
// Visibility
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RangeQualifier {
    /// `M` prefix: below the reportable range
    LessThan,
    /// `P` prefix: above the reportable range
    GreaterThan,
}

impl RangeQualifier {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "M" => Some(RangeQualifier::LessThan),
            "P" => Some(RangeQualifier::GreaterThan),
            _ => None,
        }
    }
}

/// Prevailing visibility
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Visibility {
    /// Four-digit metre group, e.g. `9999` or `0800NDV`
    Metres {
        metres: u32,
        no_directional_variation: bool,
    },
    /// Statute-mile group, e.g. `10SM`, `1 1/2SM`, `P6SM`
    StatuteMiles {
        miles: f64,
        qualifier: Option<RangeQualifier>,
    },
    /// Implied by `CAVOK`
    Cavok,
}

impl Visibility {
    pub fn statute_miles(&self) -> f64 {
        match self {
            Visibility::Metres { metres, .. } => f64::from(*metres) * STATUTE_MILES_PER_METRE,
            Visibility::StatuteMiles { miles, .. } => *miles,
            Visibility::Cavok => UNRESTRICTED_VISIBILITY_SM,
        }
    }

    pub fn kilometres(&self) -> f64 {
        match self {
            Visibility::Metres { metres, .. } => f64::from(*metres) / 1000.0,
            _ => self.statute_miles() * KILOMETRES_PER_STATUTE_MILE,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceUnit {
    Metres,
    Feet,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RvrTendency {
    Upward,
    Downward,
    NoChange,
}

impl RvrTendency {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "U" => Some(RvrTendency::Upward),
            "D" => Some(RvrTendency::Downward),
            "N" => Some(RvrTendency::NoChange),
            _ => None,
        }
    }
}

/// Runway visual range such as `R27L/P1500U` or `R09/0600V1000FT`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunwayVisualRange {
    pub runway: String,
    pub range: u32,
    pub qualifier: Option<RangeQualifier>,
    pub variable_to: Option<u32>,
    pub variable_qualifier: Option<RangeQualifier>,
    pub unit: DistanceUnit,
    pub tendency: Option<RvrTendency>,
}

// =============================================================================
// Clouds
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudCoverage {
    Few,
    Scattered,
    Broken,
    Overcast,
    VerticalVisibility,
}

impl CloudCoverage {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "FEW" => Some(CloudCoverage::Few),
            "SCT" => Some(CloudCoverage::Scattered),
            "BKN" => Some(CloudCoverage::Broken),
            "OVC" => Some(CloudCoverage::Overcast),
            "VV" => Some(CloudCoverage::VerticalVisibility),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CloudCoverage::Few => "FEW",
            CloudCoverage::Scattered => "SCT",
            CloudCoverage::Broken => "BKN",
            CloudCoverage::Overcast => "OVC",
            CloudCoverage::VerticalVisibility => "VV",
        }
    }

    /// Broken, overcast and vertical visibility layers form a ceiling
    pub fn forms_ceiling(&self) -> bool {
        matches!(
            self,
            CloudCoverage::Broken | CloudCoverage::Overcast | CloudCoverage::VerticalVisibility
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CloudType {
    Cumulonimbus,
    ToweringCumulus,
}

impl CloudType {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "CB" => Some(CloudType::Cumulonimbus),
            "TCU" => Some(CloudType::ToweringCumulus),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            CloudType::Cumulonimbus => "CB",
            CloudType::ToweringCumulus => "TCU",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CloudLayer {
    pub coverage: CloudCoverage,
    /// Base height above ground in feet
    pub height_ft: u32,
    pub cloud_type: Option<CloudType>,
}

impl CloudLayer {
    pub fn new(coverage: CloudCoverage, coded_height: u32, cloud_type: Option<CloudType>) -> Self {
        Self {
            coverage,
            height_ft: coded_height * CLOUD_HEIGHT_MULTIPLIER,
            cloud_type,
        }
    }

    pub fn height_m(&self) -> u32 {
        (f64::from(self.height_ft) * METRES_PER_FOOT) as u32
    }
}

impl fmt::Display for CloudLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{:03}{}",
            self.coverage.code(),
            self.height_ft / CLOUD_HEIGHT_MULTIPLIER,
            self.cloud_type.map(|t| t.code()).unwrap_or_default()
        )
    }
}

/// Lowest broken, overcast or vertical-visibility layer, in feet
pub fn ceiling_of(layers: &[CloudLayer]) -> Option<u32> {
    layers
        .iter()
        .filter(|layer| layer.coverage.forms_ceiling())
        .map(|layer| layer.height_ft)
        .min()
}

/// Explicit "no cloud" markers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SkyClear {
    /// SKC
    SkyClear,
    /// CLR
    Clear,
    /// NSC
    NoSignificantCloud,
    /// NCD
    NoCloudDetected,
}

impl SkyClear {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "SKC" => Some(SkyClear::SkyClear),
            "CLR" => Some(SkyClear::Clear),
            "NSC" => Some(SkyClear::NoSignificantCloud),
            "NCD" => Some(SkyClear::NoCloudDetected),
            _ => None,
        }
    }
}

// =============================================================================
// Weather Phenomena
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Intensity {
    Light,
    Moderate,
    Heavy,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Descriptor {
    Shallow,
    Partial,
    Patches,
    LowDrifting,
    Blowing,
    Showers,
    Thunderstorm,
    Freezing,
}

impl Descriptor {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "MI" => Some(Descriptor::Shallow),
            "PR" => Some(Descriptor::Partial),
            "BC" => Some(Descriptor::Patches),
            "DR" => Some(Descriptor::LowDrifting),
            "BL" => Some(Descriptor::Blowing),
            "SH" => Some(Descriptor::Showers),
            "TS" => Some(Descriptor::Thunderstorm),
            "FZ" => Some(Descriptor::Freezing),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Descriptor::Shallow => "MI",
            Descriptor::Partial => "PR",
            Descriptor::Patches => "BC",
            Descriptor::LowDrifting => "DR",
            Descriptor::Blowing => "BL",
            Descriptor::Showers => "SH",
            Descriptor::Thunderstorm => "TS",
            Descriptor::Freezing => "FZ",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhenomenonCategory {
    Precipitation,
    Obscuration,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PhenomenonCode {
    // Precipitation
    Drizzle,
    Rain,
    Snow,
    SnowGrains,
    IceCrystals,
    IcePellets,
    Hail,
    SmallHail,
    UnknownPrecipitation,
    // Obscuration
    Mist,
    Fog,
    Smoke,
    VolcanicAsh,
    Dust,
    Sand,
    Haze,
    // Other
    DustWhirls,
    Squalls,
    FunnelCloud,
    Sandstorm,
    Duststorm,
}

impl PhenomenonCode {
    pub fn from_code(code: &str) -> Option<Self> {
        let phenomenon = match code {
            "DZ" => PhenomenonCode::Drizzle,
            "RA" => PhenomenonCode::Rain,
            "SN" => PhenomenonCode::Snow,
            "SG" => PhenomenonCode::SnowGrains,
            "IC" => PhenomenonCode::IceCrystals,
            "PL" => PhenomenonCode::IcePellets,
            "GR" => PhenomenonCode::Hail,
            "GS" => PhenomenonCode::SmallHail,
            "UP" => PhenomenonCode::UnknownPrecipitation,
            "BR" => PhenomenonCode::Mist,
            "FG" => PhenomenonCode::Fog,
            "FU" => PhenomenonCode::Smoke,
            "VA" => PhenomenonCode::VolcanicAsh,
            "DU" => PhenomenonCode::Dust,
            "SA" => PhenomenonCode::Sand,
            "HZ" => PhenomenonCode::Haze,
            "PO" => PhenomenonCode::DustWhirls,
            "SQ" => PhenomenonCode::Squalls,
            "FC" => PhenomenonCode::FunnelCloud,
            "SS" => PhenomenonCode::Sandstorm,
            "DS" => PhenomenonCode::Duststorm,
            _ => return None,
        };
        Some(phenomenon)
    }

    pub fn code(&self) -> &'static str {
        match self {
            PhenomenonCode::Drizzle => "DZ",
            PhenomenonCode::Rain => "RA",
            PhenomenonCode::Snow => "SN",
            PhenomenonCode::SnowGrains => "SG",
            PhenomenonCode::IceCrystals => "IC",
            PhenomenonCode::IcePellets => "PL",
            PhenomenonCode::Hail => "GR",
            PhenomenonCode::SmallHail => "GS",
            PhenomenonCode::UnknownPrecipitation => "UP",
            PhenomenonCode::Mist => "BR",
            PhenomenonCode::Fog => "FG",
            PhenomenonCode::Smoke => "FU",
            PhenomenonCode::VolcanicAsh => "VA",
            PhenomenonCode::Dust => "DU",
            PhenomenonCode::Sand => "SA",
            PhenomenonCode::Haze => "HZ",
            PhenomenonCode::DustWhirls => "PO",
            PhenomenonCode::Squalls => "SQ",
            PhenomenonCode::FunnelCloud => "FC",
            PhenomenonCode::Sandstorm => "SS",
            PhenomenonCode::Duststorm => "DS",
        }
    }

    pub fn category(&self) -> PhenomenonCategory {
        match self {
            PhenomenonCode::Drizzle
            | PhenomenonCode::Rain
            | PhenomenonCode::Snow
            | PhenomenonCode::SnowGrains
            | PhenomenonCode::IceCrystals
            | PhenomenonCode::IcePellets
            | PhenomenonCode::Hail
            | PhenomenonCode::SmallHail
            | PhenomenonCode::UnknownPrecipitation => PhenomenonCategory::Precipitation,
            PhenomenonCode::Mist
            | PhenomenonCode::Fog
            | PhenomenonCode::Smoke
            | PhenomenonCode::VolcanicAsh
            | PhenomenonCode::Dust
            | PhenomenonCode::Sand
            | PhenomenonCode::Haze => PhenomenonCategory::Obscuration,
            PhenomenonCode::DustWhirls
            | PhenomenonCode::Squalls
            | PhenomenonCode::FunnelCloud
            | PhenomenonCode::Sandstorm
            | PhenomenonCode::Duststorm => PhenomenonCategory::Other,
        }
    }
}

/// Present or forecast weather such as `-RA`, `+TSRA`, `VCSH`, `FZFG`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeatherPhenomenon {
    pub intensity: Intensity,
    pub in_vicinity: bool,
    pub descriptor: Option<Descriptor>,
    /// Empty only for a bare descriptor such as `TS` or `VCSH`
    pub codes: Vec<PhenomenonCode>,
}

impl WeatherPhenomenon {
    /// Reassemble the coded form, e.g. `+SHRA`
    pub fn code(&self) -> String {
        let mut code = String::new();
        match self.intensity {
            Intensity::Light => code.push('-'),
            Intensity::Heavy => code.push('+'),
            Intensity::Moderate => {}
        }
        if self.in_vicinity {
            code.push_str("VC");
        }
        if let Some(descriptor) = self.descriptor {
            code.push_str(descriptor.code());
        }
        for phenomenon in &self.codes {
            code.push_str(phenomenon.code());
        }
        code
    }

    pub fn has_descriptor(&self, descriptor: Descriptor) -> bool {
        self.descriptor == Some(descriptor)
    }

    pub fn has_code(&self, code: PhenomenonCode) -> bool {
        self.codes.contains(&code)
    }
}

// =============================================================================
// Temperature and Pressure
// =============================================================================

/// Temperature and dewpoint in whole degrees Celsius
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemperatureDewpoint {
    pub temperature: i8,
    pub dewpoint: i8,
}

impl TemperatureDewpoint {
    pub fn spread(&self) -> i16 {
        i16::from(self.temperature) - i16::from(self.dewpoint)
    }

    pub fn temperature_f(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature)
    }

    pub fn dewpoint_f(&self) -> f64 {
        celsius_to_fahrenheit(self.dewpoint)
    }
}

pub fn celsius_to_fahrenheit(celsius: i8) -> f64 {
    f64::from(celsius) * 9.0 / 5.0 + 32.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtremeKind {
    Max,
    Min,
}

/// Forecast temperature extreme `TX15/1514Z` / `TNM02/1606Z`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TemperatureExtreme {
    pub kind: ExtremeKind,
    pub celsius: i8,
    pub at: DayHour,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PressureUnit {
    Hectopascals,
    InchesOfMercury,
}

/// Altimeter setting, always held in hPa
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pressure {
    pub hectopascals: f64,
    /// Unit the report used
    pub reported_unit: PressureUnit,
}

impl Pressure {
    pub fn inches_of_mercury(&self) -> f64 {
        self.hectopascals * INHG_PER_HPA
    }
}

// =============================================================================
// Change Groups
// =============================================================================

/// Forecast change keyword
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ChangeIndicator {
    Tempo,
    Becmg,
    From(DayTime),
    Prob(u8),
    Nosig,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TrendTimeKind {
    From,
    Until,
    At,
}

/// `FMhhmm`, `TLhhmm` or `AThhmm` inside a METAR trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrendTime {
    pub kind: TrendTimeKind,
    pub hour: u8,
    pub minute: u8,
}

// =============================================================================
// Decoded Records
// =============================================================================

/// Conditions of one forecast period
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PeriodConditions {
    pub wind: Option<WindGroup>,
    pub wind_variation: Option<WindVariation>,
    pub visibility: Option<Visibility>,
    pub cavok: bool,
    pub clouds: Vec<CloudLayer>,
    pub sky_clear: Option<SkyClear>,
    pub phenomena: Vec<WeatherPhenomenon>,
    pub no_significant_weather: bool,
    pub temperature_extremes: Vec<TemperatureExtreme>,
}

impl PeriodConditions {
    pub fn ceiling_ft(&self) -> Option<u32> {
        ceiling_of(&self.clouds)
    }

    /// True when no group at all was decoded for the period
    pub fn is_empty(&self) -> bool {
        self == &PeriodConditions::default()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodKind {
    Base,
    Tempo,
    Becmg,
    From,
    Prob { probability: u8, tempo: bool },
}

/// Time span a period applies to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PeriodValidity {
    Window(ValidityWindow),
    /// `FMddHHmm`: open-ended, superseded by the next period
    From(DayTime),
    /// No time group was given (e.g. a METAR trend or truncated TAF)
    Unspecified,
}

impl PeriodValidity {
    pub fn window(&self) -> Option<ValidityWindow> {
        match self {
            PeriodValidity::Window(window) => Some(*window),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TafPeriod {
    pub kind: PeriodKind,
    pub validity: PeriodValidity,
    /// `FM`/`TL`/`AT` times of a METAR trend period
    pub trend_times: Vec<TrendTime>,
    /// Verbatim source text between this period's header and the next one
    pub condition_text: String,
    pub conditions: PeriodConditions,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TafHeader {
    pub station: Option<String>,
    pub issue_time: Option<DayTime>,
    pub validity: Option<ValidityWindow>,
    pub amended: bool,
    pub corrected: bool,
    pub nil: bool,
}

/// Decoded terminal forecast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TafForecast {
    pub raw_text: String,
    pub header: TafHeader,
    pub periods: Vec<TafPeriod>,
    pub remarks: Option<String>,
}

/// Decoded METAR/SPECI observation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedReport {
    /// The input exactly as given
    pub raw_text: String,
    pub report_type: Option<ReportType>,
    pub station: Option<String>,
    pub observation_time: Option<DayTime>,
    pub auto: bool,
    pub corrected: bool,
    pub nil: bool,
    pub wind: Option<WindGroup>,
    pub wind_variation: Option<WindVariation>,
    pub visibility: Option<Visibility>,
    pub cavok: bool,
    pub runway_visual_ranges: Vec<RunwayVisualRange>,
    pub clouds: Vec<CloudLayer>,
    pub sky_clear: Option<SkyClear>,
    pub phenomena: Vec<WeatherPhenomenon>,
    pub temperature: Option<TemperatureDewpoint>,
    pub pressure: Option<Pressure>,
    pub no_significant_change: bool,
    pub trend: Vec<TafPeriod>,
    pub remarks: Option<String>,
    /// Tokens no rule recognised, in order
    pub unrecognized: Vec<String>,
}

impl DecodedReport {
    /// Lowest ceiling layer in feet; never set for CAVOK
    pub fn ceiling_ft(&self) -> Option<u32> {
        if self.cavok {
            return None;
        }
        ceiling_of(&self.clouds)
    }

    pub fn visibility_sm(&self) -> Option<f64> {
        self.visibility.map(|v| v.statute_miles())
    }

    pub fn temperature_c(&self) -> Option<i8> {
        self.temperature.map(|t| t.temperature)
    }

    pub fn dewpoint_c(&self) -> Option<i8> {
        self.temperature.map(|t| t.dewpoint)
    }

    /// Whether there was any report text at all
    pub fn has_text(&self) -> bool {
        !self.raw_text.trim().is_empty()
    }
}

// =============================================================================
// Flight Category
// =============================================================================

/// Visual-flight suitability, ordered from worst to best
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum FlightCategory {
    Unknown,
    Lifr,
    Ifr,
    Mvfr,
    Vfr,
    Cavok,
}

impl FlightCategory {
    /// 5 for CAVOK down to 0 for Unknown
    pub fn score(&self) -> u8 {
        match self {
            FlightCategory::Cavok => 5,
            FlightCategory::Vfr => 4,
            FlightCategory::Mvfr => 3,
            FlightCategory::Ifr => 2,
            FlightCategory::Lifr => 1,
            FlightCategory::Unknown => 0,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FlightCategory::Cavok => "CAVOK",
            FlightCategory::Vfr => "VFR",
            FlightCategory::Mvfr => "MVFR",
            FlightCategory::Ifr => "IFR",
            FlightCategory::Lifr => "LIFR",
            FlightCategory::Unknown => "UNKNOWN",
        }
    }
}

impl fmt::Display for FlightCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reference() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 3, 15, 12, 30, 0).unwrap()
    }

    #[test]
    fn test_day_time_resolves_in_reference_month() {
        let time = DayTime {
            day: 15,
            hour: 12,
            minute: 0,
        };
        assert_eq!(
            time.resolve(reference()),
            Some(Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_day_time_rolls_back_across_month_boundary() {
        let reference = Utc.with_ymd_and_hms(2025, 3, 1, 0, 10, 0).unwrap();
        let time = DayTime {
            day: 28,
            hour: 23,
            minute: 50,
        };
        assert_eq!(
            time.resolve(reference),
            Some(Utc.with_ymd_and_hms(2025, 2, 28, 23, 50, 0).unwrap())
        );
    }

    #[test]
    fn test_hour_24_resolves_to_next_midnight() {
        let end = DayHour { day: 15, hour: 24 };
        assert_eq!(
            end.resolve(reference()),
            Some(Utc.with_ymd_and_hms(2025, 3, 16, 0, 0, 0).unwrap())
        );
    }

    #[test]
    fn test_invalid_times_do_not_resolve() {
        assert_eq!(DayHour { day: 15, hour: 25 }.resolve(reference()), None);
        assert_eq!(DayHour { day: 0, hour: 10 }.resolve(reference()), None);
    }

    #[test]
    fn test_ceiling_ignores_few_and_scattered() {
        let layers = vec![
            CloudLayer::new(CloudCoverage::Few, 5, None),
            CloudLayer::new(CloudCoverage::Overcast, 40, None),
            CloudLayer::new(CloudCoverage::Scattered, 8, None),
            CloudLayer::new(CloudCoverage::Broken, 25, Some(CloudType::Cumulonimbus)),
        ];
        assert_eq!(ceiling_of(&layers), Some(2500));
        assert_eq!(ceiling_of(&layers[..1]), None);
    }

    #[test]
    fn test_cloud_layer_display_round_trips_code() {
        let layer = CloudLayer::new(CloudCoverage::Broken, 8, Some(CloudType::ToweringCumulus));
        assert_eq!(layer.to_string(), "BKN008TCU");
        assert_eq!(layer.height_ft, 800);
        assert_eq!(layer.height_m(), 243);
    }

    #[test]
    fn test_cardinal_points() {
        assert_eq!(cardinal_point(0), "N");
        assert_eq!(cardinal_point(280), "W");
        assert_eq!(cardinal_point(225), "SW");
        assert_eq!(cardinal_point(355), "N");
    }

    #[test]
    fn test_flight_category_ordering_and_scores() {
        assert!(FlightCategory::Cavok > FlightCategory::Vfr);
        assert!(FlightCategory::Lifr > FlightCategory::Unknown);
        assert_eq!(FlightCategory::Mvfr.score(), 3);
        assert_eq!(FlightCategory::Unknown.score(), 0);
        assert_eq!(FlightCategory::Ifr.to_string(), "IFR");
    }

    #[test]
    fn test_visibility_conversions() {
        let metres = Visibility::Metres {
            metres: 9999,
            no_directional_variation: false,
        };
        assert!((metres.statute_miles() - 6.213).abs() < 0.01);
        assert!((metres.kilometres() - 9.999).abs() < 1e-9);
        assert_eq!(Visibility::Cavok.statute_miles(), 10.0);
    }

    #[test]
    fn test_wind_speed_conversions() {
        let wind = WindGroup {
            direction: WindDirection::Degrees(90),
            speed: 10,
            gust: Some(20),
            unit: SpeedUnit::MetresPerSecond,
        };
        assert!((wind.speed_knots() - 19.438).abs() < 0.01);
        assert_eq!(wind.speed_mps(), 10.0);
        assert!(wind.gust_is_consistent());

        let knots = WindGroup {
            unit: SpeedUnit::Knots,
            ..wind
        };
        assert!((knots.speed_mps() - 5.144).abs() < 0.01);
        assert!((knots.speed_kmh() - 18.52).abs() < 0.01);
        assert_eq!(wind.cardinal(), Some("E"));
    }
}
