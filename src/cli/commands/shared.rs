//! Shared components for CLI commands
//!
//! Logging setup and output helpers used by every command.

use crate::cli::args::Args;
use crate::models::FlightCategory;
use anyhow::{Context, Result};
use colored::{ColoredString, Colorize};
use serde::Serialize;
use tracing::debug;

/// Set up structured logging
pub fn setup_logging(args: &Args) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let log_level = args.get_log_level();

    // Create filter
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("metar_taf={}", log_level)));

    if args.quiet {
        // Minimal logging for quiet mode
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_writer(std::io::stderr)
                    .compact(),
            )
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_level(true)
                    .with_timer(fmt::time::uptime())
                    .with_writer(std::io::stderr),
            )
            .init();
    }

    debug!("Logging initialized at level: {}", log_level);
    Ok(())
}

/// Category label in its display colour
pub fn colorize_category(category: FlightCategory) -> ColoredString {
    let label = category.label();
    match category {
        FlightCategory::Cavok => label.green().bold(),
        FlightCategory::Vfr => label.blue().bold(),
        FlightCategory::Mvfr => label.yellow().bold(),
        FlightCategory::Ifr => label.red().bold(),
        FlightCategory::Lifr => label.magenta().bold(),
        FlightCategory::Unknown => label.bright_black(),
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}

/// Format an optional value or a dash
pub fn or_dash<T: std::fmt::Display>(value: Option<T>) -> String {
    value.map_or_else(|| "-".to_string(), |v| v.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_colorize_keeps_label() {
        colored::control::set_override(false);
        assert_eq!(colorize_category(FlightCategory::Mvfr).to_string(), "MVFR");
        assert_eq!(
            colorize_category(FlightCategory::Unknown).to_string(),
            "UNKNOWN"
        );
    }

    #[test]
    fn test_or_dash() {
        assert_eq!(or_dash(Some(17)), "17");
        assert_eq!(or_dash::<u32>(None), "-");
    }
}
