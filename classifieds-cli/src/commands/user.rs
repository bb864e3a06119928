//! User command - manage registered users

use anyhow::{bail, Result};
use clap::Subcommand;
use colored::Colorize;

use super::{autosave, get_context};
use crate::output;
use classifieds_core::User;

#[derive(Subcommand)]
pub enum UserCommands {
    /// Register a new user
    Add {
        /// Email address (unique key)
        email: String,
        /// Display name
        name: String,
    },
    /// Remove a user; their listings stay on the board
    Remove {
        email: String,
    },
    /// Look up a user by email
    Find {
        email: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List all users
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change a user's display name
    Rename {
        email: String,
        /// New display name
        name: String,
    },
}

pub fn run(command: UserCommands) -> Result<()> {
    let ctx = get_context()?;

    match command {
        UserCommands::Add { email, name } => {
            let user = User::new(&email, &name)?;
            ctx.users.add(user)?;
            autosave(&ctx)?;
            output::success(&format!("Registered {} <{}>", name.trim(), email));
        }
        UserCommands::Remove { email } => {
            if !ctx.users.remove(&email) {
                bail!("No user with email {}", email);
            }
            autosave(&ctx)?;
            output::success(&format!("Removed {}", email));
            let remaining = ctx.listings.listings_by_owner(&email).len();
            if remaining > 0 {
                output::warning(&format!(
                    "{} listing(s) owned by {} remain on the board",
                    remaining, email
                ));
            }
        }
        UserCommands::Find { email, json } => {
            let Some(user) = ctx.users.find(&email) else {
                bail!("No user with email {}", email);
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&user)?);
            } else {
                println!("{} <{}>", user.name().bold(), user.email());
            }
        }
        UserCommands::List { json } => {
            let users = ctx.users.list();
            if json {
                println!("{}", serde_json::to_string_pretty(&users)?);
            } else if users.is_empty() {
                output::info("No users registered");
            } else {
                println!("{}", output::users_table(&users));
            }
        }
        UserCommands::Rename { email, name } => {
            let user = ctx.users.rename(&email, &name)?;
            autosave(&ctx)?;
            output::success(&format!("{} is now {}", user.email(), user.name()));
        }
    }

    Ok(())
}
