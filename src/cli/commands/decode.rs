//! Metar and taf command implementations
//!
//! Decodes a single report given on the command line and prints either a
//! human-readable summary or the decoded record as JSON.

use super::shared::{colorize_category, or_dash, print_json};
use crate::cli::args::{OutputFormat, ReportArgs};
use crate::config::DecoderConfig;
use crate::flight_category::{classify_period, classify_with_config};
use crate::metar::decode_metar;
use crate::models::{
    DecodedReport, FlightCategory, PeriodKind, PeriodValidity, RangeQualifier, SpeedUnit,
    TafForecast, TafPeriod, TrendTimeKind, Visibility, WindDirection, WindGroup,
};
use crate::taf::decode_taf;
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::info;

#[derive(Serialize)]
struct MetarOutput<'a> {
    #[serde(flatten)]
    report: &'a DecodedReport,
    category: FlightCategory,
    score: u8,
}

/// Metar command runner
pub fn run_metar(args: &ReportArgs, format: OutputFormat) -> Result<()> {
    let raw = args.raw_text();
    let reference = args.reference_time()?;
    let config = DecoderConfig::default();

    info!("Decoding METAR: {}", raw);
    let report = decode_metar(&raw);
    let (category, score) = classify_with_config(&report, &config);

    match format {
        OutputFormat::Json => print_json(&MetarOutput {
            report: &report,
            category,
            score,
        }),
        OutputFormat::Human => {
            println!("{}", format_report(&report, category, score, reference));
            Ok(())
        }
    }
}

/// Taf command runner
pub fn run_taf(args: &ReportArgs, format: OutputFormat) -> Result<()> {
    let raw = args.raw_text();
    let reference = args.reference_time()?;
    let config = DecoderConfig::default();

    info!("Decoding TAF: {}", raw);
    let forecast = decode_taf(&raw);

    match format {
        OutputFormat::Json => print_json(&forecast),
        OutputFormat::Human => {
            println!("{}", format_forecast(&forecast, &config, reference));
            Ok(())
        }
    }
}

/// Human-readable summary of a decoded observation
pub fn format_report(
    report: &DecodedReport,
    category: FlightCategory,
    score: u8,
    reference: Option<DateTime<Utc>>,
) -> String {
    let mut lines = Vec::new();

    let mut title = format!(
        "{}  observed {}",
        report.station.as_deref().unwrap_or("????"),
        or_dash(report.observation_time)
    );
    if let Some(resolved) = reference.and_then(|r| report.observation_time?.resolve(r)) {
        title.push_str(&format!(" ({})", resolved.format("%Y-%m-%d %H:%M UTC")));
    }
    if report.auto {
        title.push_str("  AUTO");
    }
    if report.nil {
        title.push_str("  NIL");
    }
    lines.push(title);

    lines.push(format!(
        "  Category     {} (score {})",
        colorize_category(category),
        score
    ));
    lines.push(format!(
        "  Wind         {}",
        report.wind.as_ref().map_or("-".to_string(), describe_wind)
    ));
    if let Some(variation) = report.wind_variation {
        lines.push(format!(
            "  Variable     {:03}° to {:03}°",
            variation.from, variation.to
        ));
    }
    lines.push(format!(
        "  Visibility   {}",
        report.visibility.as_ref().map_or("-".to_string(), describe_visibility)
    ));
    for rvr in &report.runway_visual_ranges {
        lines.push(format!("  RVR          runway {} {}", rvr.runway, rvr.range));
    }

    let clouds: Vec<String> = report.clouds.iter().map(|layer| layer.to_string()).collect();
    lines.push(format!(
        "  Clouds       {}",
        if clouds.is_empty() {
            "-".to_string()
        } else {
            clouds.join(" ")
        }
    ));
    lines.push(format!(
        "  Ceiling      {}",
        report
            .ceiling_ft()
            .map_or("-".to_string(), |ceiling| format!("{} ft", ceiling))
    ));

    if !report.phenomena.is_empty() {
        let weather: Vec<String> = report.phenomena.iter().map(|p| p.code()).collect();
        lines.push(format!("  Weather      {}", weather.join(" ")));
    }
    if let Some(temperature) = report.temperature {
        lines.push(format!(
            "  Temperature  {}°C ({:.0}°F), dewpoint {}°C",
            temperature.temperature,
            temperature.temperature_f(),
            temperature.dewpoint
        ));
    }
    if let Some(pressure) = report.pressure {
        lines.push(format!(
            "  Pressure     {:.0} hPa ({:.2} inHg)",
            pressure.hectopascals,
            pressure.inches_of_mercury()
        ));
    }
    if report.no_significant_change {
        lines.push("  Trend        NOSIG".to_string());
    }
    for period in &report.trend {
        lines.push(format!(
            "  Trend        {} {} {}",
            period_label(period.kind),
            validity_label(period),
            period.condition_text
        ));
    }
    if let Some(remarks) = &report.remarks {
        lines.push(format!("  Remarks      {}", remarks));
    }
    if !report.unrecognized.is_empty() {
        lines.push(format!("  Unrecognized {}", report.unrecognized.join(" ")));
    }

    lines.join("\n")
}

/// Human-readable period timeline of a decoded forecast
pub fn format_forecast(
    forecast: &TafForecast,
    config: &DecoderConfig,
    reference: Option<DateTime<Utc>>,
) -> String {
    let header = &forecast.header;
    let mut lines = Vec::new();

    let mut title = format!(
        "{}  issued {}  valid {}",
        header.station.as_deref().unwrap_or("????"),
        or_dash(header.issue_time),
        or_dash(header.validity)
    );
    if let Some((start, end)) = reference.and_then(|r| header.validity?.resolve(r)) {
        title.push_str(&format!(
            " ({} to {})",
            start.format("%Y-%m-%d %H:%M"),
            end.format("%Y-%m-%d %H:%M UTC")
        ));
    }
    if header.amended {
        title.push_str("  AMD");
    }
    if header.corrected {
        title.push_str("  COR");
    }
    if header.nil {
        title.push_str("  NIL");
    }
    lines.push(title);

    for period in &forecast.periods {
        let category = classify_period(&period.conditions, config);
        lines.push(format!(
            "  {:<14} {:<16} {:<8} {}",
            period_label(period.kind),
            validity_label(period),
            colorize_category(category),
            period.condition_text
        ));
    }
    if let Some(remarks) = &forecast.remarks {
        lines.push(format!("  Remarks  {}", remarks));
    }

    lines.join("\n")
}

fn describe_wind(wind: &WindGroup) -> String {
    if wind.is_calm() {
        return "calm".to_string();
    }

    let unit = match wind.unit {
        SpeedUnit::Knots => "KT",
        SpeedUnit::MetresPerSecond => "MPS",
    };
    let direction = match wind.direction {
        WindDirection::Degrees(degrees) => {
            format!("{:03}° ({})", degrees, wind.cardinal().unwrap_or("?"))
        }
        WindDirection::Variable => "variable".to_string(),
    };
    let mut text = format!("{} {} {}", direction, wind.speed, unit);
    if let Some(gust) = wind.gust {
        text.push_str(&format!(", gusts {} {}", gust, unit));
    }
    text
}

fn describe_visibility(visibility: &Visibility) -> String {
    match visibility {
        Visibility::Metres { metres, .. } => {
            format!("{} m ({:.2} sm)", metres, visibility.statute_miles())
        }
        Visibility::StatuteMiles { miles, qualifier } => {
            let prefix = match qualifier {
                Some(RangeQualifier::GreaterThan) => "more than ",
                Some(RangeQualifier::LessThan) => "less than ",
                None => "",
            };
            format!("{}{} sm", prefix, miles)
        }
        Visibility::Cavok => "CAVOK".to_string(),
    }
}

fn period_label(kind: PeriodKind) -> String {
    match kind {
        PeriodKind::Base => "BASE".to_string(),
        PeriodKind::Tempo => "TEMPO".to_string(),
        PeriodKind::Becmg => "BECMG".to_string(),
        PeriodKind::From => "FM".to_string(),
        PeriodKind::Prob {
            probability,
            tempo: true,
        } => format!("PROB{} TEMPO", probability),
        PeriodKind::Prob { probability, .. } => format!("PROB{}", probability),
    }
}

fn validity_label(period: &TafPeriod) -> String {
    match period.validity {
        PeriodValidity::Window(window) => window.to_string(),
        PeriodValidity::From(at) => format!("from {}", at),
        PeriodValidity::Unspecified if !period.trend_times.is_empty() => period
            .trend_times
            .iter()
            .map(|time| {
                let prefix = match time.kind {
                    TrendTimeKind::From => "FM",
                    TrendTimeKind::Until => "TL",
                    TrendTimeKind::At => "AT",
                };
                format!("{}{:02}{:02}", prefix, time.hour, time.minute)
            })
            .collect::<Vec<_>>()
            .join(" "),
        PeriodValidity::Unspecified => "-".to_string(),
    }
}
