//! Classifieds CLI - a classified-ads bulletin board in your terminal

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{prelude::*, EnvFilter};

mod commands;
mod output;

use commands::{autosave, clear, listing, transfer, user};

/// Classifieds - buy and sell listings from your terminal
#[derive(Parser)]
#[command(name = "classifieds", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage registered users
    User {
        #[command(subcommand)]
        command: user::UserCommands,
    },

    /// Create, search and update listings
    Listing {
        #[command(subcommand)]
        command: listing::ListingCommands,
    },

    /// Remove every listing and restart ids at 1
    Clear {
        /// Skip confirmation prompt
        #[arg(long, short)]
        force: bool,
    },

    /// Remove expired sale listings
    Purge {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Write the board to a listings file
    Export {
        /// Destination file
        path: PathBuf,
    },

    /// Replace the board with the listings in a file
    Import {
        /// Listings file to read
        path: PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Export or import the users file
    Users {
        #[command(subcommand)]
        command: transfer::UsersCommands,
    },

    /// Manage automatic saving after each change
    Autosave {
        #[command(subcommand)]
        command: Option<autosave::AutosaveCommands>,
    },
}

fn main() -> ExitCode {
    init_logging();
    let cli = Cli::parse();

    let result = run(cli);

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            output::error(&format!("{:#}", e));
            ExitCode::FAILURE
        }
    }
}

/// Diagnostics go to stderr so JSON on stdout stays clean. `RUST_LOG`
/// overrides the default `warn` level.
fn init_logging() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .compact()
                .with_writer(std::io::stderr),
        )
        .init();
}

fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::User { command } => user::run(command),
        Commands::Listing { command } => listing::run(command),
        Commands::Clear { force } => clear::run(force),
        Commands::Purge { json } => clear::run_purge(json),
        Commands::Export { path } => transfer::export_listings(&path),
        Commands::Import { path, json } => transfer::import_listings(&path, json),
        Commands::Users { command } => transfer::run_users(command),
        Commands::Autosave { command } => autosave::run(command),
    }
}
