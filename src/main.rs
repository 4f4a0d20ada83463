use clap::Parser;
use metar_taf::cli::{args::Args, commands};
use std::process;

fn main() {
    // Parse command line arguments
    let args = Args::parse();

    // If no subcommand was provided, show help and available commands
    if args.command.is_none() {
        show_help_and_commands();
        process::exit(0);
    }

    if let Err(error) = commands::run(args) {
        eprintln!("Error: {:#}", error);
        process::exit(1);
    }
}

/// Show help information and available commands when no subcommand is provided
fn show_help_and_commands() {
    println!("wxdecode - METAR/TAF Decoder");
    println!("============================");
    println!();
    println!("Decode raw aviation weather reports and classify flight conditions");
    println!("as CAVOK, VFR, MVFR, IFR or LIFR.");
    println!();
    println!("USAGE:");
    println!("    wxdecode <COMMAND> [OPTIONS]");
    println!();
    println!("COMMANDS:");
    println!("    metar       Decode a METAR or SPECI observation");
    println!("    taf         Decode a TAF and print its period timeline");
    println!("    rank        Rank stations from a file of METARs");
    println!("    help        Show this help message or help for specific commands");
    println!();
    println!("OPTIONS:");
    println!("    -f, --format <human|json>   Output format");
    println!("    -v, --verbose               Increase logging verbosity");
    println!("    -q, --quiet                 Only log errors");
    println!("    -h, --help                  Show help information");
    println!("    -V, --version               Show version information");
    println!();
    println!("EXAMPLES:");
    println!("    # Decode an observation:");
    println!("    wxdecode metar LFRN 151200Z 28012KT 9999 FEW030 17/12 Q1015");
    println!();
    println!("    # Decode a forecast as JSON:");
    println!("    wxdecode --format json taf \"TAF LFRN 151100Z 1512/1612 26010KT 9999 SCT020\"");
    println!();
    println!("    # Rank selected stations:");
    println!("    wxdecode rank --input metars.txt --stations LFRN,LFRB,EGLL");
}
