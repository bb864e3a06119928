//! Listing domain model
//!
//! A listing is either a purchase request ("wanted") or a sale offer. Both
//! share one validated attribute set; sale offers carry an expiry date and a
//! sold flag on top of it.

use std::sync::LazyLock;

use chrono::{Local, NaiveDate};
use regex::Regex;
use rust_decimal::Decimal;
use serde::Serialize;

use super::ids::IdSequence;
use super::result::{Error, Result};
use super::user::User;

/// Substituted for a blank description
pub const DEFAULT_DESCRIPTION: &str = "No description available.";

// Letters, digits and inner blanks; line breaks would split a file record
static KEYWORD_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9 \t]+$").expect("valid keyword regex"));

/// Today's date on the local clock
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Raw values for the attributes shared by every listing
#[derive(Debug, Clone)]
pub struct ListingFields {
    pub title: String,
    pub description: String,
    pub price: Decimal,
    pub owner: User,
    pub keywords: Vec<String>,
}

impl ListingFields {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        price: Decimal,
        owner: User,
        keywords: Vec<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            price,
            owner,
            keywords,
        }
    }
}

/// What kind of ad a listing is
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ListingKind {
    /// A "wanted" ad
    Purchase,
    /// An offer to sell
    Sale { expiry_date: NaiveDate, sold: bool },
}

impl ListingKind {
    /// An unsold sale offer expiring on `expiry_date`
    pub fn sale(expiry_date: NaiveDate) -> Self {
        Self::Sale {
            expiry_date,
            sold: false,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Purchase => "purchase",
            Self::Sale { .. } => "sale",
        }
    }
}

/// A classified ad on the board
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    id: u32,
    title: String,
    description: String,
    price: Decimal,
    owner: User,
    keywords: Vec<String>,
    #[serde(flatten)]
    kind: ListingKind,
}

impl Listing {
    /// Create a brand new listing, taking the next id from `ids`.
    ///
    /// The sequence is only consumed once every field has validated.
    pub fn new(ids: &mut IdSequence, fields: ListingFields, kind: ListingKind) -> Result<Self> {
        let mut listing = Self::build(IdSequence::FIRST, fields, kind, true)?;
        listing.id = ids.allocate()?;
        Ok(listing)
    }

    /// Create a listing with a caller-chosen id, advancing `ids` past it
    pub fn with_id(
        ids: &mut IdSequence,
        id: u32,
        fields: ListingFields,
        kind: ListingKind,
    ) -> Result<Self> {
        let listing = Self::build(id, fields, kind, true)?;
        ids.observe(id);
        Ok(listing)
    }

    /// Rebuild a persisted listing. Same as `with_id` except that a sale
    /// expiry already in the past is accepted.
    pub fn restore(
        ids: &mut IdSequence,
        id: u32,
        fields: ListingFields,
        kind: ListingKind,
    ) -> Result<Self> {
        let listing = Self::build(id, fields, kind, false)?;
        ids.observe(id);
        Ok(listing)
    }

    fn build(
        id: u32,
        fields: ListingFields,
        kind: ListingKind,
        check_expiry: bool,
    ) -> Result<Self> {
        IdSequence::validate(id)?;
        let title = normalize_title(fields.title)?;
        validate_price(fields.price)?;
        let keywords = normalize_keywords(fields.keywords)?;
        if check_expiry {
            if let ListingKind::Sale { expiry_date, .. } = &kind {
                validate_expiry(*expiry_date)?;
            }
        }

        Ok(Self {
            id,
            title,
            description: normalize_description(fields.description),
            price: fields.price,
            owner: fields.owner,
            keywords,
            kind,
        })
    }

    // === Accessors ===

    pub fn id(&self) -> u32 {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price(&self) -> Decimal {
        self.price
    }

    pub fn owner(&self) -> &User {
        &self.owner
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn kind(&self) -> &ListingKind {
        &self.kind
    }

    pub fn is_sale(&self) -> bool {
        matches!(self.kind, ListingKind::Sale { .. })
    }

    /// Expiry date of a sale offer, `None` for purchase requests
    pub fn expiry_date(&self) -> Option<NaiveDate> {
        match self.kind {
            ListingKind::Sale { expiry_date, .. } => Some(expiry_date),
            ListingKind::Purchase => None,
        }
    }

    pub fn is_sold(&self) -> bool {
        matches!(self.kind, ListingKind::Sale { sold: true, .. })
    }

    /// A sale offer is expired once today is past its expiry date
    pub fn is_expired(&self) -> bool {
        self.expiry_date().is_some_and(|date| today() > date)
    }

    /// Exact, case-sensitive keyword membership
    pub fn contains_keyword(&self, word: &str) -> bool {
        self.keywords.iter().any(|k| k == word)
    }

    // === Updates ===
    //
    // Each update validates before touching state, so a rejected call leaves
    // the listing as it was. Text values are stored trimmed.

    pub fn set_title(&mut self, title: impl Into<String>) -> Result<()> {
        self.title = normalize_title(title.into())?;
        Ok(())
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = normalize_description(description.into());
    }

    pub fn set_price(&mut self, price: Decimal) -> Result<()> {
        validate_price(price)?;
        self.price = price;
        Ok(())
    }

    /// Replace the whole keyword list
    pub fn set_keywords(&mut self, keywords: Vec<String>) -> Result<()> {
        self.keywords = normalize_keywords(keywords)?;
        Ok(())
    }

    pub fn set_expiry_date(&mut self, date: NaiveDate) -> Result<()> {
        match &mut self.kind {
            ListingKind::Sale { expiry_date, .. } => {
                validate_expiry(date)?;
                *expiry_date = date;
                Ok(())
            }
            ListingKind::Purchase => Err(Error::invalid_data(format!(
                "listing {} is a purchase request and has no expiry date",
                self.id
            ))),
        }
    }

    pub fn set_sold(&mut self, value: bool) -> Result<()> {
        match &mut self.kind {
            ListingKind::Sale { sold, .. } => {
                *sold = value;
                Ok(())
            }
            ListingKind::Purchase => Err(Error::invalid_data(format!(
                "listing {} is a purchase request and cannot be sold",
                self.id
            ))),
        }
    }
}

fn normalize_title(title: String) -> Result<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(Error::invalid_data("title cannot be empty"));
    }
    if title.contains(['\r', '\n']) {
        return Err(Error::invalid_data("title must fit on one line"));
    }
    Ok(title.to_string())
}

fn validate_price(price: Decimal) -> Result<()> {
    if price < Decimal::ZERO {
        return Err(Error::invalid_data("price cannot be negative"));
    }
    Ok(())
}

/// Trim every keyword, then check the list is non-empty and each word valid
fn normalize_keywords(keywords: Vec<String>) -> Result<Vec<String>> {
    if keywords.is_empty() {
        return Err(Error::invalid_data("keyword list cannot be empty"));
    }
    keywords
        .into_iter()
        .map(|k| {
            let word = k.trim();
            if KEYWORD_RE.is_match(word) {
                Ok(word.to_string())
            } else {
                Err(Error::invalid_data(format!("invalid keyword: {:?}", k)))
            }
        })
        .collect()
}

fn validate_expiry(date: NaiveDate) -> Result<()> {
    if date < today() {
        return Err(Error::invalid_data(format!(
            "expiry date {} is in the past",
            date
        )));
    }
    Ok(())
}

/// Blank becomes the default text; line breaks become spaces
fn normalize_description(description: String) -> String {
    let description = description.replace(['\r', '\n'], " ");
    let description = description.trim();
    if description.is_empty() {
        DEFAULT_DESCRIPTION.to_string()
    } else {
        description.to_string()
    }
}
