//! Constants for METAR/TAF decoding
//!
//! This module contains conversion factors, keyword tables and the default
//! flight-rule thresholds used throughout the decoder.

// =============================================================================
// Unit Conversions
// =============================================================================

/// Statute miles per metre
pub const STATUTE_MILES_PER_METRE: f64 = 0.000621371;

/// Kilometres per statute mile
pub const KILOMETRES_PER_STATUTE_MILE: f64 = 1.60934;

/// Hectopascals per hundredth of an inch of mercury (`A2992` -> 1013.1 hPa)
pub const HPA_PER_CENTI_INHG: f64 = 0.3386;

/// Inches of mercury per hectopascal
pub const INHG_PER_HPA: f64 = 0.02953;

/// Kilometres per hour per knot
pub const KMH_PER_KNOT: f64 = 1.852;

/// Knots per metre per second
pub const KNOTS_PER_MPS: f64 = 1.943_844;

/// Metres per foot
pub const METRES_PER_FOOT: f64 = 0.3048;

/// Cloud and vertical-visibility heights are coded in hundreds of feet
pub const CLOUD_HEIGHT_MULTIPLIER: u32 = 100;

// =============================================================================
// Flight Category Defaults
// =============================================================================

/// Visibility sentinel for CAVOK and for absent visibility (statute miles)
pub const UNRESTRICTED_VISIBILITY_SM: f64 = 10.0;

/// Ceiling assumed when no ceiling layer is reported (feet)
pub const UNRESTRICTED_CEILING_FT: u32 = 10_000;

/// Default flight rule thresholds as (minimum visibility sm, minimum ceiling ft)
pub mod thresholds {
    pub const VFR: (f64, u32) = (5.0, 3000);
    pub const MVFR: (f64, u32) = (3.0, 1000);
    pub const IFR: (f64, u32) = (1.0, 500);
}

// =============================================================================
// Keywords
// =============================================================================

/// Report type keywords that may precede the station identifier
pub const REPORT_TYPES: &[&str] = &["METAR", "SPECI", "TAF"];

/// Report modifiers that may follow the issue/observation time
pub const REPORT_MODIFIERS: &[&str] = &["AUTO", "COR", "AMD", "NIL"];

/// Sky condition markers reported instead of cloud layers
pub const SKY_CLEAR_MARKERS: &[&str] = &["SKC", "CLR", "NSC", "NCD"];

/// Remarks marker; everything after it is free text
pub const REMARKS_MARKER: &str = "RMK";

/// Weather descriptors (two-letter qualifiers preceding a phenomenon)
pub const WEATHER_DESCRIPTORS: &[&str] = &["MI", "PR", "BC", "DR", "BL", "SH", "TS", "FZ"];

/// Precipitation codes
pub const PRECIPITATION_CODES: &[&str] = &["DZ", "RA", "SN", "SG", "IC", "PL", "GR", "GS", "UP"];

/// Obscuration codes
pub const OBSCURATION_CODES: &[&str] = &["BR", "FG", "FU", "VA", "DU", "SA", "HZ"];

/// Other phenomenon codes
pub const OTHER_PHENOMENON_CODES: &[&str] = &["PO", "SQ", "FC", "SS", "DS"];

/// 16-point compass rose, clockwise from north
pub const CARDINAL_POINTS: [&str; 16] = [
    "N", "NNE", "NE", "ENE", "E", "ESE", "SE", "SSE", "S", "SSW", "SW", "WSW", "W", "WNW", "NW",
    "NNW",
];
