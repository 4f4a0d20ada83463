//! Station ranking by visual-flight suitability.

use crate::config::DecoderConfig;
use crate::flight_category::classify_with_config;
use crate::metar::decode_metar;
use crate::models::{DecodedReport, FlightCategory, TafForecast};
use crate::taf::decode_taf;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// A station with its latest reports and derived category
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StationWeather {
    pub icao: String,
    pub raw_metar: Option<String>,
    pub raw_taf: Option<String>,
    pub metar: Option<DecodedReport>,
    pub taf: Option<TafForecast>,
    pub category: FlightCategory,
    pub score: u8,
}

impl StationWeather {
    /// Decode and classify a station's reports with the default config
    pub fn new(icao: impl Into<String>, raw_metar: Option<&str>, raw_taf: Option<&str>) -> Self {
        Self::with_config(icao, raw_metar, raw_taf, &DecoderConfig::default())
    }

    /// Decode and classify a station's reports.
    ///
    /// A missing or blank METAR leaves the station Unknown with score 0.
    pub fn with_config(
        icao: impl Into<String>,
        raw_metar: Option<&str>,
        raw_taf: Option<&str>,
        config: &DecoderConfig,
    ) -> Self {
        let raw_metar = non_blank(raw_metar);
        let raw_taf = non_blank(raw_taf);

        let metar = raw_metar.map(decode_metar);
        let (category, score) = metar
            .as_ref()
            .map_or((FlightCategory::Unknown, 0), |report| {
                classify_with_config(report, config)
            });

        Self {
            icao: icao.into(),
            raw_metar: raw_metar.map(str::to_string),
            raw_taf: raw_taf.map(str::to_string),
            metar,
            taf: raw_taf.map(decode_taf),
            category,
            score,
        }
    }
}

fn non_blank(raw: Option<&str>) -> Option<&str> {
    raw.filter(|text| !text.trim().is_empty())
}

/// Order stations best first; ties keep their input order
pub fn rank_stations(mut stations: Vec<StationWeather>) -> Vec<StationWeather> {
    stations.sort_by(|a, b| b.score.cmp(&a.score));
    debug!(
        "Ranked {} stations, best: {}",
        stations.len(),
        stations
            .first()
            .map_or("none", |station| station.icao.as_str())
    );
    stations
}
