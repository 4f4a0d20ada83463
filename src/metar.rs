//! METAR/SPECI decoding.
//!
//! Assembles the classified token stream of a single observation into a flat
//! [`DecodedReport`]. Observation groups are collected up to the first change
//! keyword; anything after it is the trend forecast and is segmented into
//! periods. Text after `RMK` is kept verbatim as remarks.

use crate::conditions::ConditionsBuilder;
use crate::models::{ClassifiedToken, DecodedReport, Group, GroupKind, ReportModifier};
use crate::taf::segment;
use crate::tokenizer::{split_remarks, tokenize_and_classify};
use tracing::debug;

/// Decode a raw METAR or SPECI.
///
/// Never fails: fields whose group is absent stay unset and the raw text is
/// always retained unmodified.
pub fn decode_metar(raw: &str) -> DecodedReport {
    let classified = tokenize_and_classify(raw);
    let (body, remarks) = split_remarks(raw, &classified);

    let trend_start = body
        .iter()
        .position(|t| t.kind() == GroupKind::ChangeIndicator)
        .unwrap_or(body.len());
    let (observation, trend) = body.split_at(trend_start);

    let mut report = DecodedReport {
        raw_text: raw.to_string(),
        remarks,
        ..Default::default()
    };
    assemble_observation(&mut report, observation);

    if !trend.is_empty() {
        let timeline = segment(raw, trend, None);
        report.no_significant_change = timeline.no_significant_change;
        report.trend = timeline.periods;
        // CAVOK anywhere in the report classifies the whole report as CAVOK
        if report.trend.iter().any(|period| period.conditions.cavok) {
            report.cavok = true;
        }
    }

    debug!(
        "Decoded METAR {}: {} clouds, {} phenomena, {} trend periods, {} unrecognized",
        report.station.as_deref().unwrap_or("????"),
        report.clouds.len(),
        report.phenomena.len(),
        report.trend.len(),
        report.unrecognized.len()
    );

    report
}

/// Fill the observation fields; first occurrence of a singular group wins
fn assemble_observation(report: &mut DecodedReport, tokens: &[ClassifiedToken<'_>]) {
    let mut conditions = ConditionsBuilder::new();

    for token in tokens {
        // Forecast-only groups have no place in an observation
        if matches!(
            token.group,
            Group::NoSignificantWeather | Group::TemperatureExtreme(_)
        ) {
            report.unrecognized.push(token.token.text.to_string());
            continue;
        }
        if conditions.push(&token.group) {
            continue;
        }
        match &token.group {
            Group::ReportType(report_type) => {
                report.report_type.get_or_insert(*report_type);
            }
            Group::StationIdentifier(station) => {
                report.station.get_or_insert_with(|| station.clone());
            }
            Group::StationTime(time) => {
                report.observation_time.get_or_insert(*time);
            }
            Group::Modifier(modifier) => match modifier {
                ReportModifier::Auto => report.auto = true,
                ReportModifier::Corrected => report.corrected = true,
                ReportModifier::Nil => report.nil = true,
                ReportModifier::Amended => {}
            },
            Group::RunwayVisualRange(rvr) => report.runway_visual_ranges.push(rvr.clone()),
            Group::TemperatureDewpoint(temperature) => {
                report.temperature.get_or_insert(*temperature);
            }
            Group::Pressure(pressure) => {
                report.pressure.get_or_insert(*pressure);
            }
            _ => report.unrecognized.push(token.token.text.to_string()),
        }
    }

    let conditions = conditions.finish();
    report.wind = conditions.wind;
    report.wind_variation = conditions.wind_variation;
    report.visibility = conditions.visibility;
    report.cavok = conditions.cavok;
    report.clouds = conditions.clouds;
    report.sky_clear = conditions.sky_clear;
    report.phenomena = conditions.phenomena;
}
