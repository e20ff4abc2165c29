// SPDX-FileCopyrightText: 2026 Voyagio Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voyagio - a trip-planning workflow service.
//!
//! Binary entry point: loads configuration, then dispatches to the
//! subcommand implementations.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

mod backup;
mod estimate;
mod serve;
mod status;

/// Voyagio - a trip-planning workflow service.
#[derive(Parser, Debug)]
#[command(name = "voyagio", version, about, long_about = None)]
struct Cli {
    /// Path to a config file (defaults to the standard search order).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the trip workflow service.
    Serve,
    /// Show whether a running service is healthy.
    Status {
        /// Output structured JSON for scripting.
        #[arg(long)]
        json: bool,
        /// Disable colored output.
        #[arg(long)]
        plain: bool,
    },
    /// Compute a cost estimate from a JSON input file (or stdin).
    Estimate {
        /// Path to a CostEstimateInput JSON file; reads stdin when omitted.
        input: Option<PathBuf>,
    },
    /// Back up the trip database to a file.
    Backup {
        /// Destination path for the backup.
        output: PathBuf,
    },
    /// Restore the trip database from a backup file.
    Restore {
        /// Backup file to restore from.
        input: PathBuf,
    },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match cli.config {
        Some(ref path) => voyagio_config::load_and_validate_path(path),
        None => voyagio_config::load_and_validate(),
    };
    let config = match config {
        Ok(config) => config,
        Err(errors) => {
            voyagio_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Status { json, plain }) => status::run_status(&config, json, plain).await,
        Some(Commands::Estimate { input }) => estimate::run_estimate(input.as_deref()),
        Some(Commands::Backup { output }) => {
            backup::run_backup(&config.storage.database_path, &output.to_string_lossy())
        }
        Some(Commands::Restore { input }) => {
            backup::run_restore(&config.storage.database_path, &input.to_string_lossy())
        }
        None => {
            println!("voyagio: use --help for available commands");
            Ok(())
        }
    };

    if let Err(err) = result {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
