//! Clear and purge commands - bulk removal from the board

use anyhow::Result;
use colored::Colorize;
use dialoguer::Confirm;
use serde_json::json;

use super::{autosave, get_context};
use crate::output;

pub fn run(force: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let count = ctx.listings.board().len();

    // Confirm removal unless --force
    if !force {
        let warning = format!("This will remove all {} listing(s) from the board.", count);
        println!("\n{}", warning.yellow());
        println!("{}\n", "Registered users are kept.".dimmed());

        if !Confirm::new()
            .with_prompt("Are you sure?")
            .default(false)
            .interact()?
        {
            println!("{}\n", "Cancelled".dimmed());
            return Ok(());
        }
    }

    ctx.listings.clear_board();
    autosave(&ctx)?;
    output::success(&format!("Removed {} listing(s)", count));

    Ok(())
}

pub fn run_purge(json: bool) -> Result<()> {
    let mut ctx = get_context()?;
    let purged = ctx.listings.purge_expired();
    if purged > 0 {
        autosave(&ctx)?;
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&json!({ "purged": purged }))?);
    } else if purged == 0 {
        output::info("No expired listings");
    } else {
        output::success(&format!("Purged {} expired listing(s)", purged));
    }

    Ok(())
}
