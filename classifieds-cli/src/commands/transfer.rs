//! Export and import commands - move data files in and out of the board

use std::path::Path;

use anyhow::{Context, Result};
use clap::Subcommand;

use super::{autosave, get_context};
use crate::output;

#[derive(Subcommand)]
pub enum UsersCommands {
    /// Write all users to a CSV file
    Export {
        /// Destination file
        path: std::path::PathBuf,
    },
    /// Replace the registered users with those in a CSV file
    Import {
        /// CSV file to read
        path: std::path::PathBuf,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn export_listings(path: &Path) -> Result<()> {
    let ctx = get_context()?;
    ctx.listings
        .save_to_file(path)
        .with_context(|| format!("Failed to export listings to {}", path.display()))?;
    output::success(&format!(
        "Exported {} listing(s) to {}",
        ctx.listings.board().len(),
        path.display()
    ));
    Ok(())
}

pub fn import_listings(path: &Path, json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let report = ctx
        .listings
        .load_from_file(path)
        .with_context(|| format!("Failed to import listings from {}", path.display()))?;
    autosave(&ctx)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        output::success(&format!("Imported {} listing(s)", report.loaded));
        if report.skipped > 0 {
            output::warning(&format!("Skipped {} invalid row(s)", report.skipped));
        }
    }
    Ok(())
}

pub fn run_users(command: UsersCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        UsersCommands::Export { path } => {
            ctx.users
                .save_to_file(&path)
                .with_context(|| format!("Failed to export users to {}", path.display()))?;
            output::success(&format!("Exported {} user(s) to {}", ctx.users.len(), path.display()));
        }
        UsersCommands::Import { path, json } => {
            let report = ctx
                .users
                .load_from_file(&path)
                .with_context(|| format!("Failed to import users from {}", path.display()))?;
            autosave(&ctx)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                output::success(&format!("Imported {} user(s)", report.loaded));
                if report.skipped > 0 {
                    output::warning(&format!("Skipped {} invalid row(s)", report.skipped));
                }
            }
        }
    }

    Ok(())
}
