//! Group classifiers for coded report groups.
//!
//! Each function recognises exactly one category of group from a single
//! token and returns its typed value, or `None` when the token does not have
//! that shape. Matching is anchored on the whole token, so a classifier never
//! accepts a partial match. Positional rules (which classifier may run where)
//! belong to the tokenizer.

use crate::constants::{
    HPA_PER_CENTI_INHG, OBSCURATION_CODES, OTHER_PHENOMENON_CODES, PRECIPITATION_CODES,
    WEATHER_DESCRIPTORS,
};
use crate::models::{
    ChangeIndicator, CloudCoverage, CloudLayer, CloudType, DayHour, DayTime, Descriptor,
    DistanceUnit, ExtremeKind, Intensity, PhenomenonCode, Pressure, PressureUnit, RangeQualifier,
    RunwayVisualRange, RvrTendency, SpeedUnit, TemperatureDewpoint, TemperatureExtreme, TrendTime,
    TrendTimeKind, ValidityWindow, Visibility, WeatherPhenomenon, WindDirection, WindGroup,
    WindVariation,
};
use regex::Regex;
use std::sync::LazyLock;

static STATION_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{4}$").unwrap());

static STATION_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})(\d{2})Z$").unwrap());

static VALIDITY_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{2})(\d{2})/(\d{2})(\d{2})$").unwrap());

static WIND_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\d{3}|VRB)(\d{2,3})(?:G(\d{2,3}))?(KT|MPS)$").unwrap()
});

static WIND_VARIATION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{3})V(\d{3})$").unwrap());

static VISIBILITY_METRES_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(\d{4})(NDV)?$").unwrap());

static VISIBILITY_MILES_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^([MP])?(?:(\d{1,2})\s+)?(\d{1,2})(?:/(\d{1,2}))?SM$").unwrap()
});

static RVR_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^R(\d{2}[LCR]?)/([MP])?(\d{4})(?:V([MP])?(\d{4}))?(FT)?/?([UDN])?$").unwrap()
});

static CLOUD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(FEW|SCT|BKN|OVC|VV)(\d{3})(CB|TCU)?$").unwrap());

static WEATHER_RE: LazyLock<Regex> = LazyLock::new(|| {
    let phenomena = [PRECIPITATION_CODES, OBSCURATION_CODES, OTHER_PHENOMENON_CODES].concat();
    Regex::new(&format!(
        r"^([-+]|VC)?({})?((?:{})*)$",
        WEATHER_DESCRIPTORS.join("|"),
        phenomena.join("|")
    ))
    .unwrap()
});

static TEMPERATURE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(M?\d{2})/(M?\d{2})$").unwrap());

static TEMPERATURE_EXTREME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(TX|TN)(M?\d{2})/(\d{2})(\d{2})Z$").unwrap());

static PRESSURE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^([QA])(\d{4})$").unwrap());

static FROM_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^FM(\d{2})(\d{2})(\d{2})$").unwrap());

static PROB_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^PROB(\d{2})$").unwrap());

static TREND_TIME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(FM|TL|AT)(\d{2})(\d{2})$").unwrap());

/// Parse a fixed-width numeric capture; the regexes guarantee digits
fn number<T: std::str::FromStr>(text: &str) -> Option<T> {
    text.parse().ok()
}

/// Parse a Celsius value with an optional `M` (minus) prefix
fn signed_celsius(text: &str) -> Option<i8> {
    match text.strip_prefix('M') {
        Some(value) => number::<i8>(value).map(|v| -v),
        None => number(text),
    }
}

fn valid_day(day: u8) -> bool {
    (1..=31).contains(&day)
}

/// Four-letter ICAO station identifier
pub fn parse_station_identifier(text: &str) -> Option<String> {
    STATION_RE.is_match(text).then(|| text.to_string())
}

/// Whether `text` has the shape of a four-letter ICAO identifier
pub fn is_icao_identifier(text: &str) -> bool {
    STATION_RE.is_match(text)
}

/// Observation or issue time `ddHHmmZ`
pub fn parse_station_time(text: &str) -> Option<DayTime> {
    let caps = STATION_TIME_RE.captures(text)?;
    let time = DayTime {
        day: number(&caps[1])?,
        hour: number(&caps[2])?,
        minute: number(&caps[3])?,
    };
    (valid_day(time.day) && time.hour < 24 && time.minute < 60).then_some(time)
}

/// Validity range `ddHH/ddHH`
pub fn parse_validity_window(text: &str) -> Option<ValidityWindow> {
    let caps = VALIDITY_RE.captures(text)?;
    let start = DayHour {
        day: number(&caps[1])?,
        hour: number(&caps[2])?,
    };
    let end = DayHour {
        day: number(&caps[3])?,
        hour: number(&caps[4])?,
    };
    let valid = |dh: &DayHour| valid_day(dh.day) && dh.hour <= 24;
    (valid(&start) && valid(&end)).then_some(ValidityWindow { start, end })
}

/// Surface wind `dddff[Gff]KT`, `VRBffKT` or the `MPS` equivalents
pub fn parse_wind(text: &str) -> Option<WindGroup> {
    let caps = WIND_RE.captures(text)?;
    let direction = match &caps[1] {
        "VRB" => WindDirection::Variable,
        degrees => {
            let degrees: u16 = number(degrees)?;
            if degrees > 360 {
                return None;
            }
            WindDirection::Degrees(degrees)
        }
    };

    Some(WindGroup {
        direction,
        speed: number(&caps[2])?,
        gust: match caps.get(3) {
            Some(gust) => Some(number(gust.as_str())?),
            None => None,
        },
        unit: SpeedUnit::from_code(&caps[4])?,
    })
}

/// Variable wind direction range `dddVddd`
pub fn parse_wind_variation(text: &str) -> Option<WindVariation> {
    let caps = WIND_VARIATION_RE.captures(text)?;
    let variation = WindVariation {
        from: number(&caps[1])?,
        to: number(&caps[2])?,
    };
    (variation.from <= 360 && variation.to <= 360).then_some(variation)
}

/// Bare four-digit visibility in metres, optionally suffixed `NDV`
pub fn parse_visibility_metres(text: &str) -> Option<Visibility> {
    let caps = VISIBILITY_METRES_RE.captures(text)?;
    Some(Visibility::Metres {
        metres: number(&caps[1])?,
        no_directional_variation: caps.get(2).is_some(),
    })
}

/// Statute-mile visibility: `10SM`, `1/2SM`, `1 1/2SM`, `P6SM`, `M1/4SM`
pub fn parse_visibility_miles(text: &str) -> Option<Visibility> {
    let caps = VISIBILITY_MILES_RE.captures(text)?;
    let whole: f64 = match caps.get(2) {
        Some(whole) => number(whole.as_str())?,
        None => 0.0,
    };
    let numerator: f64 = number(&caps[3])?;

    let miles = match caps.get(4) {
        Some(denominator) => {
            let denominator: f64 = number(denominator.as_str())?;
            if denominator == 0.0 {
                return None;
            }
            whole + numerator / denominator
        }
        // "1 2SM" is not a fraction
        None if caps.get(2).is_some() => return None,
        None => numerator,
    };

    Some(Visibility::StatuteMiles {
        miles,
        qualifier: caps.get(1).and_then(|q| RangeQualifier::from_code(q.as_str())),
    })
}

/// Runway visual range `Rdd[LCR]/[MP]dddd[V[MP]dddd][FT][/][UDN]`
pub fn parse_runway_visual_range(text: &str) -> Option<RunwayVisualRange> {
    let caps = RVR_RE.captures(text)?;
    Some(RunwayVisualRange {
        runway: caps[1].to_string(),
        range: number(&caps[3])?,
        qualifier: caps.get(2).and_then(|q| RangeQualifier::from_code(q.as_str())),
        variable_to: match caps.get(5) {
            Some(to) => Some(number(to.as_str())?),
            None => None,
        },
        variable_qualifier: caps.get(4).and_then(|q| RangeQualifier::from_code(q.as_str())),
        unit: if caps.get(6).is_some() {
            DistanceUnit::Feet
        } else {
            DistanceUnit::Metres
        },
        tendency: caps.get(7).and_then(|t| RvrTendency::from_code(t.as_str())),
    })
}

/// Cloud layer `FEW030`, `BKN008TCU`, `VV002`
pub fn parse_cloud_layer(text: &str) -> Option<CloudLayer> {
    let caps = CLOUD_RE.captures(text)?;
    Some(CloudLayer::new(
        CloudCoverage::from_code(&caps[1])?,
        number(&caps[2])?,
        caps.get(3).and_then(|t| CloudType::from_code(t.as_str())),
    ))
}

/// Weather phenomenon: intensity or vicinity prefix, optional descriptor,
/// then one or more phenomenon codes.
///
/// A bare `TS` (optionally `VC`/intensity-prefixed) and `VCSH` are accepted
/// without a phenomenon code.
pub fn parse_weather_phenomenon(text: &str) -> Option<WeatherPhenomenon> {
    let caps = WEATHER_RE.captures(text)?;
    let prefix = caps.get(1).map(|p| p.as_str());
    let descriptor = caps.get(2).and_then(|d| Descriptor::from_code(d.as_str()));
    let coded = caps.get(3).map_or("", |c| c.as_str());

    let codes = coded
        .as_bytes()
        .chunks(2)
        .map(|pair| std::str::from_utf8(pair).ok().and_then(PhenomenonCode::from_code))
        .collect::<Option<Vec<_>>>()?;

    let in_vicinity = prefix == Some("VC");
    if codes.is_empty() {
        let bare_allowed = match descriptor {
            Some(Descriptor::Thunderstorm) => true,
            Some(Descriptor::Showers) => in_vicinity,
            _ => false,
        };
        if !bare_allowed {
            return None;
        }
    }

    let intensity = match prefix {
        Some("-") => Intensity::Light,
        Some("+") => Intensity::Heavy,
        _ => Intensity::Moderate,
    };

    Some(WeatherPhenomenon {
        intensity,
        in_vicinity,
        descriptor,
        codes,
    })
}

/// Temperature/dewpoint `17/12`, `M01/M03`
pub fn parse_temperature_dewpoint(text: &str) -> Option<TemperatureDewpoint> {
    let caps = TEMPERATURE_RE.captures(text)?;
    Some(TemperatureDewpoint {
        temperature: signed_celsius(&caps[1])?,
        dewpoint: signed_celsius(&caps[2])?,
    })
}

/// Forecast extreme `TX15/1514Z`, `TNM02/1606Z`
pub fn parse_temperature_extreme(text: &str) -> Option<TemperatureExtreme> {
    let caps = TEMPERATURE_EXTREME_RE.captures(text)?;
    let at = DayHour {
        day: number(&caps[3])?,
        hour: number(&caps[4])?,
    };
    if !valid_day(at.day) || at.hour > 24 {
        return None;
    }

    Some(TemperatureExtreme {
        kind: if &caps[1] == "TX" {
            ExtremeKind::Max
        } else {
            ExtremeKind::Min
        },
        celsius: signed_celsius(&caps[2])?,
        at,
    })
}

/// Pressure `Q1015` (hPa) or `A2992` (hundredths of inHg, converted to hPa)
pub fn parse_pressure(text: &str) -> Option<Pressure> {
    let caps = PRESSURE_RE.captures(text)?;
    let value: f64 = number(&caps[2])?;
    let pressure = match &caps[1] {
        "Q" => Pressure {
            hectopascals: value,
            reported_unit: PressureUnit::Hectopascals,
        },
        _ => Pressure {
            hectopascals: value * HPA_PER_CENTI_INHG,
            reported_unit: PressureUnit::InchesOfMercury,
        },
    };
    Some(pressure)
}

/// Change group keyword: `TEMPO`, `BECMG`, `NOSIG`, `FMddHHmm`, `PROBnn`
pub fn parse_change_indicator(text: &str) -> Option<ChangeIndicator> {
    match text {
        "TEMPO" => return Some(ChangeIndicator::Tempo),
        "BECMG" => return Some(ChangeIndicator::Becmg),
        "NOSIG" => return Some(ChangeIndicator::Nosig),
        _ => {}
    }

    if let Some(caps) = FROM_RE.captures(text) {
        let time = DayTime {
            day: number(&caps[1])?,
            hour: number(&caps[2])?,
            minute: number(&caps[3])?,
        };
        return (valid_day(time.day) && time.hour <= 24 && time.minute < 60)
            .then_some(ChangeIndicator::From(time));
    }

    PROB_RE
        .captures(text)
        .and_then(|caps| number(&caps[1]))
        .map(ChangeIndicator::Prob)
}

/// METAR trend time `FMhhmm`, `TLhhmm`, `AThhmm`
pub fn parse_trend_time(text: &str) -> Option<TrendTime> {
    let caps = TREND_TIME_RE.captures(text)?;
    let kind = match &caps[1] {
        "FM" => TrendTimeKind::From,
        "TL" => TrendTimeKind::Until,
        _ => TrendTimeKind::At,
    };
    let time = TrendTime {
        kind,
        hour: number(&caps[2])?,
        minute: number(&caps[3])?,
    };
    (time.hour <= 24 && time.minute < 60).then_some(time)
}
