//! CLI command implementations

pub mod autosave;
pub mod clear;
pub mod listing;
pub mod transfer;
pub mod user;

use std::path::PathBuf;

use anyhow::{Context, Result};
use classifieds_core::ClassifiedsContext;
use colored::Colorize;

/// Get the data directory from environment or default
pub fn get_data_dir() -> Result<PathBuf> {
    if let Ok(dir) = std::env::var("CLASSIFIEDS_DIR") {
        return Ok(PathBuf::from(dir));
    }
    let home = dirs::home_dir().context("Could not find home directory")?;
    Ok(home.join(".classifieds"))
}

/// Create the data directory if needed and load the board
pub fn get_context() -> Result<ClassifiedsContext> {
    let data_dir = get_data_dir()?;

    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory: {:?}", data_dir))?;

    ClassifiedsContext::new(&data_dir)
        .with_context(|| format!("Failed to open board in {:?}", data_dir))
}

/// Persist both data files when auto-save is on
pub fn autosave(ctx: &ClassifiedsContext) -> Result<()> {
    if ctx.config.auto_save {
        ctx.persist().context("Failed to save board")?;
    } else {
        eprintln!("{}", "Auto-save is off; changes were not written".yellow());
    }
    Ok(())
}
