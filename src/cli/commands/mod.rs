//! Command implementations for the wxdecode CLI
//!
//! Each command is implemented in its own module:
//! - `decode`: single METAR or TAF decoding
//! - `rank`: station ranking from a report file

pub mod decode;
pub mod rank;
pub mod shared;

use crate::cli::args::{Args, Commands};
use anyhow::Result;

/// Main command runner
///
/// Sets up logging and dispatches to the selected subcommand. Does nothing
/// when no subcommand was given.
pub fn run(args: Args) -> Result<()> {
    let Some(command) = args.command.as_ref() else {
        return Ok(());
    };
    shared::setup_logging(&args)?;

    match command {
        Commands::Metar(report_args) => decode::run_metar(report_args, args.output_format),
        Commands::Taf(report_args) => decode::run_taf(report_args, args.output_format),
        Commands::Rank(rank_args) => rank::run_rank(rank_args, args.output_format),
    }
}
