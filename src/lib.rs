//! METAR/TAF Decoder Library
//!
//! Turns raw aviation weather reports into structured, typed data.
//!
//! This library provides tools for:
//! - Classifying coded groups (wind, visibility, clouds, weather, temperature, pressure)
//! - Tokenizing reports with positional disambiguation of ambiguous numeric groups
//! - Decoding METAR/SPECI observations, including trend forecasts
//! - Segmenting TAF forecasts into an ordered TEMPO/BECMG/FM/PROB timeline
//! - Deriving CAVOK/VFR/MVFR/IFR/LIFR flight categories and ranking stations
//!
//! Decoding never fails: groups that cannot be decoded are simply absent
//! from the result. The `try_` variants reject input that is not report
//! text at all.

pub mod conditions;
pub mod config;
pub mod constants;
pub mod error;
pub mod flight_category;
pub mod groups;
pub mod metar;
pub mod models;
pub mod ranking;
pub mod taf;
pub mod tokenizer;

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use config::{DecoderConfig, FlightRuleThresholds};
pub use error::{DecodeError, Result};
pub use flight_category::{classify_flight_category, classify_with_config};
pub use groups::is_icao_identifier;
pub use metar::decode_metar;
pub use models::{DecodedReport, FlightCategory, TafForecast, TafPeriod};
pub use ranking::{StationWeather, rank_stations};
pub use taf::decode_taf;

/// Validate raw bytes and decode them as a METAR
pub fn try_decode_metar(bytes: &[u8]) -> Result<DecodedReport> {
    let raw = error::validate_report_bytes(bytes)?;
    Ok(decode_metar(raw))
}

/// Validate raw bytes and decode them as a TAF
pub fn try_decode_taf(bytes: &[u8]) -> Result<TafForecast> {
    let raw = error::validate_report_bytes(bytes)?;
    Ok(decode_taf(raw))
}
