//! GeoPulse CLI - Command-line interface
//!
//! Acquires the device position and reports it to the collector, either on
//! demand or whenever the server asks over the push channel.

mod commands;
mod error;
mod prompt;
mod runner;
mod tui_app;
mod ui;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::config::ConfigCommands;
use runner::GlobalOptions;

#[derive(Parser)]
#[command(name = "geopulse")]
#[command(version = geopulse::VERSION)]
#[command(about = "Acquire the device location and report it to a collector", long_about = None)]
struct Cli {
    /// Use this config file instead of ~/.geopulse/config.ini
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the location screen and answer push requests (main command)
    ///
    /// Acquires the position on start, keeps the push channel open, and
    /// reports the stored position whenever the server sends a message.
    /// Keys: r refresh, s send, q quit.
    Run,

    /// Acquire the position once and print it
    Locate,

    /// Report a position once
    ///
    /// Acquires first unless both --lat and --long are given.
    Send {
        /// Latitude in decimal degrees
        #[arg(long, allow_negative_numbers = true, requires = "long")]
        lat: Option<f64>,

        /// Longitude in decimal degrees
        #[arg(long, allow_negative_numbers = true, requires = "lat")]
        long: Option<f64>,
    },

    /// View and modify configuration settings
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        config: cli.config,
        debug: cli.debug,
    };

    let result = match cli.command {
        Commands::Run => commands::run::run(&options),
        Commands::Locate => commands::locate::run(&options),
        Commands::Send { lat, long } => {
            commands::send::run(&options, commands::send::SendArgs { lat, long })
        }
        Commands::Config { command } => commands::config::run(&options, command),
    };

    if let Err(e) = result {
        e.exit();
    }
}
