//! Wayfinder CLI - Command-line compass frontend.
//!
//! This binary provides a command-line interface to the Wayfinder library:
//! live compass acquisition in the terminal, map link generation, and
//! configuration management.

mod commands;
mod error;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use commands::map_link::MapLinkArgs;
use commands::run::RunArgs;
use wayfinder::logging::{self, LogConfig};

#[derive(Debug, Parser)]
#[command(
    name = "wayfinder",
    version = wayfinder::VERSION,
    about = "Device-orientation compass with a simulated desktop fallback"
)]
struct Cli {
    /// Log at debug level
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Also write logs to this file
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Run the compass, printing heading and location updates
    Run(RunArgs),

    /// Print a shareable map link for a coordinate
    MapLink(MapLinkArgs),

    /// View and modify configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        "wayfinder=debug"
    } else {
        logging::DEFAULT_LOG_FILTER
    };
    let mut log_config = LogConfig::default().with_filter(filter);
    if let Some(path) = &cli.log_file {
        log_config = log_config.with_file(path);
    }
    let _log_guard = match logging::init(log_config) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: logging disabled: {}", e);
            None
        }
    };

    let result = match cli.command {
        Commands::Run(args) => commands::run::run(args),
        Commands::MapLink(args) => commands::map_link::run(args),
        Commands::Config { command } => commands::config::run(command),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
