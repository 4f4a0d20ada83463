//! Rank command implementation
//!
//! Reads one raw METAR per line from a file, classifies each station and
//! prints them best flight category first.

use super::shared::{colorize_category, print_json};
use crate::cli::args::{OutputFormat, RankArgs};
use crate::config::DecoderConfig;
use crate::constants::REPORT_TYPES;
use crate::groups::parse_station_identifier;
use crate::ranking::{StationWeather, rank_stations};
use anyhow::{Context, Result};
use std::path::Path;
use tracing::{debug, info, warn};

/// Rank command runner
pub fn run_rank(args: &RankArgs, format: OutputFormat) -> Result<()> {
    args.validate()?;

    let reports = read_reports(&args.input_path)?;
    info!(
        "Read {} reports from {}",
        reports.len(),
        args.input_path.display()
    );

    let config = DecoderConfig::default();
    let wanted = args.stations.as_ref().map(|list| list.stations.as_slice());
    let ranked = rank_stations(build_stations(&reports, wanted, &config));

    match format {
        OutputFormat::Json => print_json(&ranked),
        OutputFormat::Human => {
            println!("{}", format_ranking(&ranked));
            Ok(())
        }
    }
}

/// Read non-blank, non-comment lines from a report file
pub fn read_reports(path: &Path) -> Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read report file: {}", path.display()))?;

    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// Pair reports with stations.
///
/// Without a station list every report with a station identifier is used,
/// keeping the first report per station. With a list, each listed station
/// takes its first report, or none.
pub fn build_stations(
    reports: &[String],
    wanted: Option<&[String]>,
    config: &DecoderConfig,
) -> Vec<StationWeather> {
    let mut by_station: Vec<(String, &str)> = Vec::new();
    for report in reports {
        let Some(station) = report_station(report) else {
            warn!("Skipping report without station identifier: {}", report);
            continue;
        };
        if by_station.iter().any(|(known, _)| *known == station) {
            debug!("Ignoring later report for {}", station);
            continue;
        }
        by_station.push((station, report.as_str()));
    }

    match wanted {
        Some(stations) => stations
            .iter()
            .map(|icao| {
                let raw = by_station
                    .iter()
                    .find(|(station, _)| station == icao)
                    .map(|(_, raw)| *raw);
                if raw.is_none() {
                    warn!("No report for {}", icao);
                }
                StationWeather::with_config(icao.as_str(), raw, None, config)
            })
            .collect(),
        None => by_station
            .into_iter()
            .map(|(station, raw)| StationWeather::with_config(station, Some(raw), None, config))
            .collect(),
    }
}

/// Station identifier of a raw report, after an optional report-type keyword
fn report_station(report: &str) -> Option<String> {
    report
        .split_whitespace()
        .find(|word| !REPORT_TYPES.contains(word))
        .and_then(parse_station_identifier)
}

/// One line per station: rank, identifier, category, score, raw report
pub fn format_ranking(stations: &[StationWeather]) -> String {
    stations
        .iter()
        .enumerate()
        .map(|(index, station)| {
            format!(
                "{:>3}. {}  {:<7} {}  {}",
                index + 1,
                station.icao,
                colorize_category(station.category),
                station.score,
                station.raw_metar.as_deref().unwrap_or("-")
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FlightCategory;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn report_file(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_read_reports_skips_comments_and_blanks() {
        let file = report_file(
            "# morning reports\n\nLFRN 151200Z 3000 BKN005\n   \nLFRB 151200Z CAVOK\n",
        );
        let reports = read_reports(file.path()).unwrap();
        assert_eq!(
            reports,
            vec!["LFRN 151200Z 3000 BKN005", "LFRB 151200Z CAVOK"]
        );
    }

    #[test]
    fn test_read_reports_missing_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let err = read_reports(&dir.path().join("missing.txt")).unwrap_err();
        assert!(err.to_string().contains("Failed to read report file"));
    }

    #[test]
    fn test_build_and_rank_all_stations() {
        let file = report_file(
            "LFRN 151200Z 3000 BKN005\nLFRB 151200Z 00000KT CAVOK\nLFRN 151230Z 9999\nEGLL 151220Z 9999 BKN020\n",
        );
        let reports = read_reports(file.path()).unwrap();
        let ranked = rank_stations(build_stations(&reports, None, &DecoderConfig::default()));

        let order: Vec<_> = ranked
            .iter()
            .map(|s| (s.icao.as_str(), s.category))
            .collect();
        assert_eq!(
            order,
            vec![
                ("LFRB", FlightCategory::Cavok),
                ("EGLL", FlightCategory::Mvfr),
                ("LFRN", FlightCategory::Ifr),
            ]
        );
    }

    #[test]
    fn test_listed_station_without_report_is_unknown() {
        let reports = vec!["LFRN 151200Z 9999 FEW030".to_string()];
        let wanted = vec!["LFPG".to_string(), "LFRN".to_string()];
        let ranked = rank_stations(build_stations(
            &reports,
            Some(wanted.as_slice()),
            &DecoderConfig::default(),
        ));
        assert_eq!(ranked[0].icao, "LFRN");
        assert_eq!(ranked[0].score, 4);
        assert_eq!(ranked[1].icao, "LFPG");
        assert_eq!(ranked[1].category, FlightCategory::Unknown);
    }

    #[test]
    fn test_report_station() {
        assert_eq!(report_station("LFRN 151200Z 9999").as_deref(), Some("LFRN"));
        assert_eq!(report_station("METAR LFRB 151200Z CAVOK").as_deref(), Some("LFRB"));
        assert_eq!(report_station("SPECI EGLL 151220Z").as_deref(), Some("EGLL"));
        assert_eq!(report_station("151200Z LFRN 9999"), None);
        assert_eq!(report_station("METAR"), None);
    }

    #[test]
    fn test_format_ranking() {
        colored::control::set_override(false);
        let stations = vec![StationWeather::new("LFRB", Some("LFRB 151200Z CAVOK"), None)];
        assert_eq!(
            format_ranking(&stations),
            "  1. LFRB  CAVOK   5  LFRB 151200Z CAVOK"
        );
    }
}
