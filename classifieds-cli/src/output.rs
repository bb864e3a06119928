//! Output formatting utilities

use colored::Colorize;
use comfy_table::{presets::UTF8_FULL_CONDENSED, Table, ContentArrangement};

use classifieds_core::{Listing, User};

/// Print a success message
pub fn success(msg: &str) {
    println!("{}", msg.green());
}

/// Print an error message
pub fn error(msg: &str) {
    eprintln!("{}", msg.red());
}

/// Print a warning message
pub fn warning(msg: &str) {
    println!("{}", msg.yellow());
}

/// Print an info message
pub fn info(msg: &str) {
    println!("{}", msg.cyan());
}

/// Create a styled table
pub fn create_table() -> Table {
    let mut table = Table::new();
    table.load_preset(UTF8_FULL_CONDENSED);
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// One row per listing; sale columns stay blank for purchase requests
pub fn listings_table(listings: &[Listing]) -> Table {
    let mut table = create_table();
    table.set_header(vec![
        "ID", "Type", "Title", "Price", "Owner", "Keywords", "Expires", "Status",
    ]);

    for listing in listings {
        let expires = listing
            .expiry_date()
            .map(|d| d.to_string())
            .unwrap_or_default();
        table.add_row(vec![
            listing.id().to_string(),
            listing.kind().label().to_string(),
            listing.title().to_string(),
            listing.price().to_string(),
            listing.owner().email().to_string(),
            listing.keywords().join(", "),
            expires,
            status(listing).to_string(),
        ]);
    }
    table
}

pub fn users_table(users: &[User]) -> Table {
    let mut table = create_table();
    table.set_header(vec!["Email", "Name"]);
    for user in users {
        table.add_row(vec![user.email(), user.name()]);
    }
    table
}

/// Print every field of a single listing
pub fn print_listing(listing: &Listing) {
    println!("{} {}", format!("#{}", listing.id()).bold(), listing.title().bold());
    println!("  Type:        {}", listing.kind().label());
    println!("  Description: {}", listing.description());
    println!("  Price:       {}", listing.price());
    println!(
        "  Owner:       {} <{}>",
        listing.owner().name(),
        listing.owner().email()
    );
    println!("  Keywords:    {}", listing.keywords().join(", "));
    if let Some(date) = listing.expiry_date() {
        println!("  Expires:     {}", date);
        println!("  Status:      {}", status(listing));
    }
}

fn status(listing: &Listing) -> &'static str {
    if !listing.is_sale() {
        ""
    } else if listing.is_sold() {
        "sold"
    } else if listing.is_expired() {
        "expired"
    } else {
        "open"
    }
}
