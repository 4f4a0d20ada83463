//! Command-line argument definitions for the METAR/TAF decoder
//!
//! This module defines the CLI interface using the clap derive API.

use crate::groups::is_icao_identifier;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;
use std::str::FromStr;

/// CLI arguments for the METAR/TAF decoder
///
/// Decodes raw aviation weather reports into structured data and ranks
/// stations by visual-flight suitability.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "wxdecode",
    version,
    about = "Decode METAR and TAF reports and classify flight conditions",
    long_about = "Decodes raw METAR observations and TAF forecasts into structured groups \
                  (wind, visibility, clouds, weather, temperature, pressure), segments forecasts \
                  into their TEMPO/BECMG/FM/PROB timeline, and derives the CAVOK/VFR/MVFR/IFR/LIFR \
                  flight category. Reports are read from the command line or a file; no network \
                  access is performed."
)]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Logging verbosity level
    #[arg(
        short = 'v',
        long = "verbose",
        global = true,
        action = clap::ArgAction::Count,
        help = "Increase logging verbosity (-v: info, -vv: debug, -vvv: trace)"
    )]
    pub verbose: u8,

    /// Only show errors. Overrides verbose settings.
    #[arg(
        short = 'q',
        long = "quiet",
        global = true,
        conflicts_with = "verbose",
        help = "Suppress all log output except errors"
    )]
    pub quiet: bool,

    /// Output format
    #[arg(
        short = 'f',
        long = "format",
        global = true,
        value_enum,
        default_value = "human",
        help = "Output format"
    )]
    pub output_format: OutputFormat,
}

/// Available subcommands
#[derive(Debug, Clone, Subcommand)]
pub enum Commands {
    /// Decode a METAR or SPECI observation
    Metar(ReportArgs),
    /// Decode a TAF and print its period timeline
    Taf(ReportArgs),
    /// Rank stations from a file of METARs, best flight category first
    Rank(RankArgs),
}

/// Arguments for the metar and taf commands
#[derive(Debug, Clone, Parser)]
pub struct ReportArgs {
    /// Raw report text; separate words are joined with single spaces
    #[arg(
        value_name = "RAW",
        required = true,
        num_args = 1..,
        trailing_var_arg = true,
        allow_hyphen_values = true
    )]
    pub raw: Vec<String>,

    /// Resolve report times against this UTC timestamp (RFC 3339)
    #[arg(
        long = "reference",
        value_name = "TIMESTAMP",
        help = "Resolve day/hour groups against this RFC 3339 timestamp"
    )]
    pub reference: Option<String>,
}

impl ReportArgs {
    /// The report as a single line of text
    pub fn raw_text(&self) -> String {
        self.raw.join(" ")
    }

    /// Parse the reference timestamp if one was given
    pub fn reference_time(&self) -> Result<Option<DateTime<Utc>>> {
        self.reference
            .as_deref()
            .map(|text| {
                DateTime::parse_from_rfc3339(text)
                    .map(|time| time.with_timezone(&Utc))
                    .with_context(|| format!("Invalid reference timestamp: {}", text))
            })
            .transpose()
    }
}

/// Arguments for the rank command
#[derive(Debug, Clone, Parser)]
pub struct RankArgs {
    /// File with one raw METAR per line
    ///
    /// Blank lines and lines starting with `#` are ignored.
    #[arg(
        short = 'i',
        long = "input",
        value_name = "FILE",
        help = "File with one raw METAR per line"
    )]
    pub input_path: PathBuf,

    /// Only rank these stations (comma-separated ICAO identifiers)
    ///
    /// Listed stations with no report in the input are ranked as UNKNOWN.
    #[arg(
        short = 's',
        long = "stations",
        value_name = "LIST",
        help = "Comma-separated list of ICAO identifiers to rank"
    )]
    pub stations: Option<StationList>,
}

impl RankArgs {
    /// Validate the rank command arguments
    pub fn validate(&self) -> Result<()> {
        if !self.input_path.exists() {
            bail!("Input file does not exist: {}", self.input_path.display());
        }
        if !self.input_path.is_file() {
            bail!("Input path is not a file: {}", self.input_path.display());
        }
        Ok(())
    }
}

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON format for scripting
    Json,
}

/// Wrapper for parsing comma-separated station lists
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationList {
    pub stations: Vec<String>,
}

impl FromStr for StationList {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        let stations: Vec<String> = s
            .split(',')
            .map(|s| s.trim().to_ascii_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        if stations.is_empty() {
            bail!("Station list cannot be empty");
        }

        if let Some(invalid) = stations.iter().find(|s| !is_icao_identifier(s)) {
            bail!("'{}' is not a four-letter ICAO identifier", invalid);
        }

        Ok(StationList { stations })
    }
}

impl Args {
    /// Determine the appropriate log level based on verbosity flags
    pub fn get_log_level(&self) -> &'static str {
        if self.quiet {
            "error"
        } else {
            match self.verbose {
                0 => "warn",
                1 => "info",
                2 => "debug",
                _ => "trace",
            }
        }
    }
}
