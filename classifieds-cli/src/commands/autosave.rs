//! Autosave command - manage automatic saving

use anyhow::Result;
use clap::Subcommand;
use colored::Colorize;

use super::get_data_dir;
use classifieds_core::config::Config;

#[derive(Subcommand)]
pub enum AutosaveCommands {
    /// Save the data files after every change
    #[command(name = "on")]
    On,
    /// Leave the data files untouched (dry runs)
    #[command(name = "off")]
    Off,
    /// Show auto-save status
    Status,
}

pub fn run(command: Option<AutosaveCommands>) -> Result<()> {
    let data_dir = get_data_dir()?;
    std::fs::create_dir_all(&data_dir)?;
    let mut config = Config::load(&data_dir)?;

    match command {
        Some(AutosaveCommands::On) => {
            config.enable_auto_save();
            config.save(&data_dir)?;
            println!("{}", "Auto-save enabled".green());
        }
        Some(AutosaveCommands::Off) => {
            config.disable_auto_save();
            config.save(&data_dir)?;
            println!("{}", "Auto-save disabled".yellow());
            println!("Changes made from now on are not written to disk.");
        }
        Some(AutosaveCommands::Status) | None => {
            if config.auto_save {
                println!("Auto-save is {}", "ON".green());
            } else {
                println!("Auto-save is {}", "OFF".yellow());
            }
        }
    }

    Ok(())
}
