//! Listings text file format
//!
//! One header line followed by one listing per line, semicolon separated and
//! never quoted:
//!
//! ```text
//! Classified Listings Buy/Sell
//! 3;Road bike;Barely used;120.5;a@x.com;bike,sport;2030-06-01;false
//! ;Want sofa;;40;b@x.com;sofa
//! ```
//!
//! Fields: id (may be empty), title, description, price, owner email,
//! comma-separated keywords, then for sale offers the ISO expiry date and an
//! optional sold flag.

use std::io::Write;

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::domain::result::{Error, Result};
use crate::domain::{Listing, ListingKind};

/// Header written at the top of every listings file
pub const HEADER: &str = "Classified Listings Buy/Sell";

const FIELD_SEPARATOR: char = ';';
const KEYWORD_SEPARATOR: &str = ",";
const MIN_FIELDS: usize = 6;

/// One parsed data line, before it is turned into a listing
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListingRecord {
    pub id: Option<u32>,
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub owner_email: String,
    pub keywords: Vec<String>,
    pub kind: ListingKind,
}

/// Parse one data line. Any malformed value yields `InvalidData`.
pub fn parse_line(line: &str) -> Result<ListingRecord> {
    let fields: Vec<&str> = line.split(FIELD_SEPARATOR).map(str::trim).collect();

    if fields.len() < MIN_FIELDS {
        return Err(Error::invalid_data(format!(
            "expected at least {} fields, found {}",
            MIN_FIELDS,
            fields.len()
        )));
    }

    let id = if fields[0].is_empty() {
        None
    } else {
        Some(
            fields[0]
                .parse::<u32>()
                .map_err(|_| Error::invalid_data(format!("invalid id: {:?}", fields[0])))?,
        )
    };

    let price = fields[3]
        .parse::<Decimal>()
        .map_err(|_| Error::invalid_data(format!("invalid price: {:?}", fields[3])))?;

    let keywords = fields[5]
        .split(KEYWORD_SEPARATOR)
        .map(str::trim)
        .filter(|k| !k.is_empty())
        .map(String::from)
        .collect();

    // A trailing empty field does not turn a purchase line into a sale
    let kind = match fields.get(6).filter(|date| !date.is_empty()) {
        Some(date) => {
            let expiry_date = NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map_err(|_| Error::invalid_data(format!("invalid expiry date: {:?}", date)))?;
            let sold = fields
                .get(7)
                .is_some_and(|flag| flag.eq_ignore_ascii_case("true"));
            ListingKind::Sale { expiry_date, sold }
        }
        None => ListingKind::Purchase,
    };

    Ok(ListingRecord {
        id,
        title: fields[1].to_string(),
        description: fields[2].to_string(),
        price,
        owner_email: fields[4].to_string(),
        keywords,
        kind,
    })
}

/// Render a listing as one data line (no trailing newline)
pub fn format_line(listing: &Listing) -> String {
    let mut line = format!(
        "{id};{title};{description};{price};{email};{keywords}",
        id = listing.id(),
        title = listing.title(),
        description = listing.description(),
        price = listing.price(),
        email = listing.owner().email(),
        keywords = listing.keywords().join(KEYWORD_SEPARATOR),
    );

    if let ListingKind::Sale { expiry_date, sold } = listing.kind() {
        line.push_str(&format!(
            ";{};{}",
            expiry_date.format("%Y-%m-%d"),
            sold
        ));
    }
    line
}

/// Write the header and every listing
pub fn write_listings<'a, W, I>(mut writer: W, listings: I) -> std::io::Result<()>
where
    W: Write,
    I: IntoIterator<Item = &'a Listing>,
{
    writeln!(writer, "{}", HEADER)?;
    for listing in listings {
        writeln!(writer, "{}", format_line(listing))?;
    }
    writer.flush()
}
