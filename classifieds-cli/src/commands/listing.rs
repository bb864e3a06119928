//! Listing command - create, search and update listings

use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use clap::Subcommand;
use rust_decimal::Decimal;

use super::{autosave, get_context};
use crate::output;
use classifieds_core::{Listing, ListingFields};

#[derive(Subcommand)]
pub enum ListingCommands {
    /// Post a new listing (a purchase request unless --sale is given)
    New {
        /// Email of the registered owner
        #[arg(long)]
        owner: String,
        #[arg(long)]
        title: String,
        #[arg(long)]
        description: String,
        #[arg(long)]
        price: Decimal,
        /// Comma-separated keywords
        #[arg(long, value_delimiter = ',', required = true)]
        keywords: Vec<String>,
        /// Offer an item for sale instead of asking for one
        #[arg(long)]
        sale: bool,
        /// Expiry date of a sale (YYYY-MM-DD)
        #[arg(long, required_if_eq("sale", "true"))]
        expiry: Option<NaiveDate>,
        /// Use this id instead of the next free one
        #[arg(long)]
        id: Option<u32>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Remove one of your listings
    Remove {
        id: u32,
        /// Email of the owner
        #[arg(long)]
        owner: String,
    },
    /// Find listings carrying any of the given keywords
    Search {
        /// Keywords (exact, case-sensitive)
        #[arg(value_delimiter = ',')]
        keywords: Vec<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Show one listing
    Show {
        id: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List every listing on the board
    List {
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Add keywords to a listing
    Keywords {
        id: u32,
        /// Keywords to add
        #[arg(value_delimiter = ',', required = true)]
        keywords: Vec<String>,
    },
    /// Mark a sale listing as sold
    Sold {
        id: u32,
        /// Email of the owner
        #[arg(long)]
        owner: String,
        /// Mark it as available again
        #[arg(long)]
        undo: bool,
    },
    /// Change the expiry date of a sale listing
    Expiry {
        id: u32,
        /// New expiry date (YYYY-MM-DD)
        date: NaiveDate,
        /// Email of the owner
        #[arg(long)]
        owner: String,
    },
    /// Sale listings matching a purchase request's keywords
    Related {
        id: u32,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Listings posted by one user
    Mine {
        /// Email of the owner
        #[arg(long)]
        owner: String,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

pub fn run(command: ListingCommands) -> Result<()> {
    let mut ctx = get_context()?;

    match command {
        ListingCommands::New {
            owner,
            title,
            description,
            price,
            keywords,
            sale,
            expiry,
            id,
            json,
        } => {
            let owner = ctx
                .users
                .find(&owner)
                .with_context(|| format!("{} is not a registered user", owner))?;
            let fields = ListingFields::new(title, description, price, owner, trimmed(keywords));
            let listing = ctx.listings.create_listing(id, fields, sale, expiry)?;
            ctx.listings.add_listing(listing.clone())?;
            autosave(&ctx)?;

            if json {
                println!("{}", serde_json::to_string_pretty(&listing)?);
            } else {
                output::success(&format!("Posted listing #{}", listing.id()));
            }
        }
        ListingCommands::Remove { id, owner } => {
            if !ctx.listings.remove_listing(id, &owner)? {
                bail!("Listing #{} was not removed", id);
            }
            autosave(&ctx)?;
            output::success(&format!("Removed listing #{}", id));
        }
        ListingCommands::Search { keywords, json } => {
            let found = ctx.listings.search_by_keywords(&trimmed(keywords))?;
            print_listings(&found, json, "No listings match")?;
        }
        ListingCommands::Show { id, json } => {
            let listing = ctx
                .listings
                .find_by_id(id)
                .with_context(|| format!("No listing with id {}", id))?;
            if json {
                println!("{}", serde_json::to_string_pretty(listing)?);
            } else {
                output::print_listing(listing);
            }
        }
        ListingCommands::List { json } => {
            print_listings(&ctx.listings.list_all(), json, "The board is empty")?;
        }
        ListingCommands::Keywords { id, keywords } => {
            let merged = ctx
                .listings
                .add_keywords(id, &trimmed(keywords))?
                .keywords()
                .join(", ");
            autosave(&ctx)?;
            output::success(&format!("Listing #{} keywords: {}", id, merged));
        }
        ListingCommands::Sold { id, owner, undo } => {
            ctx.listings.mark_sold(id, &owner, !undo)?;
            autosave(&ctx)?;
            if undo {
                output::success(&format!("Listing #{} is available again", id));
            } else {
                output::success(&format!("Listing #{} marked as sold", id));
            }
        }
        ListingCommands::Expiry { id, date, owner } => {
            ctx.listings.update_expiry(id, &owner, date)?;
            autosave(&ctx)?;
            output::success(&format!("Listing #{} now expires on {}", id, date));
        }
        ListingCommands::Related { id, json } => {
            let related = ctx.listings.related_sales(id)?;
            print_listings(&related, json, "No sale listings match this request")?;
        }
        ListingCommands::Mine { owner, json } => {
            let mine = ctx.listings.listings_by_owner(&owner);
            print_listings(&mine, json, &format!("{} has no listings", owner))?;
        }
    }

    Ok(())
}

fn print_listings(listings: &[Listing], json: bool, empty_message: &str) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(listings)?);
    } else if listings.is_empty() {
        output::info(empty_message);
    } else {
        println!("{}", output::listings_table(listings));
    }
    Ok(())
}

fn trimmed(keywords: Vec<String>) -> Vec<String> {
    keywords
        .into_iter()
        .map(|k| k.trim().to_string())
        .filter(|k| !k.is_empty())
        .collect()
}
