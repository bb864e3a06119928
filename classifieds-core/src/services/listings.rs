//! Listing service - creation, ownership checks, search and persistence

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter};
use std::path::Path;
use std::sync::Arc;

use chrono::NaiveDate;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapters::listing_file::{self, ListingRecord};
use crate::domain::result::{Error, Result};
use crate::domain::{Board, Listing, ListingFields, ListingKind};
use crate::ports::UserDirectory;

use super::ensure_path;

/// Orchestrates the board: builds listings from raw values, enforces
/// ownership on changes, and reads and writes the listings file.
pub struct ListingService {
    board: Board,
    users: Arc<dyn UserDirectory>,
}

impl ListingService {
    pub fn new(users: Arc<dyn UserDirectory>) -> Self {
        Self {
            board: Board::new(),
            users,
        }
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    /// Build a validated listing from raw values.
    ///
    /// The listing is returned, not placed on the board. A blank description
    /// is rejected here even though the listing itself would accept it.
    pub fn create_listing(
        &mut self,
        id: Option<u32>,
        fields: ListingFields,
        for_sale: bool,
        expiry: Option<NaiveDate>,
    ) -> Result<Listing> {
        if fields.description.trim().is_empty() {
            return Err(Error::invalid_data("description cannot be empty"));
        }

        let kind = if for_sale {
            let expiry_date =
                expiry.ok_or_else(|| Error::invalid_data("a sale listing needs an expiry date"))?;
            ListingKind::sale(expiry_date)
        } else {
            ListingKind::Purchase
        };

        let ids = self.board.ids_mut();
        match id {
            Some(id) => Listing::with_id(ids, id, fields, kind),
            None => Listing::new(ids, fields, kind),
        }
    }

    /// Put a listing on the board
    pub fn add_listing(&mut self, listing: Listing) -> Result<()> {
        let id = listing.id();
        self.board.add(listing)?;
        debug!(id, "added listing");
        Ok(())
    }

    /// Remove every listing and restart ids at 1
    pub fn clear_board(&mut self) {
        self.board.clear();
        debug!("cleared board");
    }

    /// Remove a listing on behalf of `owner_email`
    pub fn remove_listing(&mut self, id: u32, owner_email: &str) -> Result<bool> {
        let owner = self.owned(id, owner_email)?.owner().clone();
        let removed = self.board.remove_by_id_and_owner(id, &owner);
        if removed {
            debug!(id, owner = owner_email, "removed listing");
        }
        Ok(removed)
    }

    /// Listings carrying any of `keywords`. No keywords means no matches.
    pub fn search_by_keywords(&self, keywords: &[String]) -> Result<Vec<Listing>> {
        if keywords.is_empty() {
            return Ok(Vec::new());
        }
        self.board.search_by_keywords(keywords)
    }

    pub fn find_by_id(&self, id: u32) -> Option<&Listing> {
        self.board.find(id)
    }

    /// Merge `new` into a listing's keywords, keeping the first occurrence
    /// of each word
    pub fn add_keywords(&mut self, id: u32, new: &[String]) -> Result<&Listing> {
        let listing = self
            .board
            .find_mut(id)
            .ok_or_else(|| Error::manager(format!("no listing with id {}", id)))?;

        let mut merged: Vec<String> = Vec::with_capacity(listing.keywords().len() + new.len());
        for word in listing.keywords().iter().chain(new) {
            let word = word.trim();
            if !merged.iter().any(|m| m == word) {
                merged.push(word.to_string());
            }
        }

        listing.set_keywords(merged)?;
        debug!(id, keywords = ?listing.keywords(), "updated keywords");
        Ok(&*listing)
    }

    pub fn list_all(&self) -> Vec<Listing> {
        self.board.list_all()
    }

    pub fn listings_by_owner(&self, email: &str) -> Vec<Listing> {
        self.board
            .iter()
            .filter(|l| l.owner().email() == email)
            .cloned()
            .collect()
    }

    /// Set or clear the sold flag of a sale listing
    pub fn mark_sold(&mut self, id: u32, owner_email: &str, sold: bool) -> Result<&Listing> {
        let listing = self.owned_mut(id, owner_email)?;
        listing.set_sold(sold)?;
        debug!(id, sold, "updated sold flag");
        Ok(&*listing)
    }

    /// Move the expiry date of a sale listing
    pub fn update_expiry(
        &mut self,
        id: u32,
        owner_email: &str,
        date: NaiveDate,
    ) -> Result<&Listing> {
        let listing = self.owned_mut(id, owner_email)?;
        listing.set_expiry_date(date)?;
        debug!(id, %date, "updated expiry date");
        Ok(&*listing)
    }

    /// Remove every expired sale listing, returning how many went
    pub fn purge_expired(&mut self) -> usize {
        let expired: Vec<Listing> = self
            .board
            .iter()
            .filter(|l| l.is_expired())
            .cloned()
            .collect();

        let before = self.board.len();
        self.board.remove_all(&expired);
        let purged = before - self.board.len();
        if purged > 0 {
            info!(purged, "purged expired listings");
        }
        purged
    }

    /// Sale listings sharing a keyword with the purchase request `id`,
    /// ignoring case
    pub fn related_sales(&self, id: u32) -> Result<Vec<Listing>> {
        let wanted = self
            .board
            .find(id)
            .ok_or_else(|| Error::not_found(format!("listing {}", id)))?;
        if wanted.is_sale() {
            return Err(Error::invalid_data(format!(
                "listing {} is a sale offer, not a purchase request",
                id
            )));
        }

        let words: HashSet<String> = wanted.keywords().iter().map(|k| k.to_lowercase()).collect();
        Ok(self
            .board
            .iter()
            .filter(|l| l.is_sale())
            .filter(|l| l.keywords().iter().any(|k| words.contains(&k.to_lowercase())))
            .cloned()
            .collect())
    }

    // === Persistence ===

    /// Write the whole board to a listings file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        ensure_path(path)?;
        let file = File::create(path)
            .map_err(|e| Error::io(format!("creating {}", path.display()), e))?;
        listing_file::write_listings(BufWriter::new(file), &self.board)
            .map_err(|e| Error::io(format!("writing {}", path.display()), e))?;
        info!(path = %path.display(), count = self.board.len(), "saved listings");
        Ok(())
    }

    /// Replace the board with the listings in a file
    pub fn load_from_file(&mut self, path: &Path) -> Result<ListingLoadReport> {
        ensure_path(path)?;
        let file = File::open(path)
            .map_err(|e| Error::io(format!("opening {}", path.display()), e))?;
        let report = self.load_from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "loaded listings"
        );
        Ok(report)
    }

    /// Replace the board with the listings read from `reader`.
    ///
    /// The board is cleared first. Lines that fail to parse or validate, or
    /// that repeat an id already loaded, are skipped. Owners missing from the
    /// user directory are registered under their email.
    pub fn load_from_reader<R: BufRead>(&mut self, reader: R) -> Result<ListingLoadReport> {
        self.board.clear();

        let mut lines = reader.lines();
        let header = lines
            .next()
            .transpose()
            .map_err(|e| Error::io("reading listings header", e))?;
        if header.as_deref().map_or(true, |h| h.trim().is_empty()) {
            return Err(Error::manager("empty file or missing header"));
        }

        let mut report = ListingLoadReport::default();
        for (index, line) in lines.enumerate() {
            // Header is line 1
            let number = index + 2;
            let line = line.map_err(|e| Error::io(format!("reading line {}", number), e))?;
            if line.trim().is_empty() {
                continue;
            }

            match self.load_line(&line) {
                Ok(()) => report.loaded += 1,
                Err(e) if e.is_row_recoverable() => {
                    warn!(line = number, error = %e, "skipping listing row");
                    report.skipped += 1;
                }
                Err(e) => return Err(e),
            }
        }

        let max_id = self.board.iter().map(Listing::id).max().unwrap_or(0);
        self.board.ids_mut().reset_to(max_id.saturating_add(1));
        Ok(report)
    }

    fn load_line(&mut self, line: &str) -> Result<()> {
        let ListingRecord {
            id,
            title,
            description,
            price,
            owner_email,
            keywords,
            kind,
        } = listing_file::parse_line(line)?;

        let id = match id {
            Some(id) => id,
            None => self.board.ids().available()?,
        };
        if self.board.find(id).is_some() {
            return Err(Error::board(format!("duplicate listing id {}", id)));
        }

        let owner = self.users.find_or_register(&owner_email)?;
        let fields = ListingFields::new(title, description, price, owner, keywords);
        let listing = Listing::restore(self.board.ids_mut(), id, fields, kind)?;
        self.board.add(listing)
    }

    // === Ownership ===

    fn owned(&self, id: u32, owner_email: &str) -> Result<&Listing> {
        let listing = self
            .board
            .find(id)
            .ok_or_else(|| Error::not_found(format!("listing {}", id)))?;
        if listing.owner().email() != owner_email {
            return Err(Error::unauthorized(format!(
                "listing {} does not belong to {}",
                id, owner_email
            )));
        }
        Ok(listing)
    }

    fn owned_mut(&mut self, id: u32, owner_email: &str) -> Result<&mut Listing> {
        self.owned(id, owner_email)?;
        self.board
            .find_mut(id)
            .ok_or_else(|| Error::not_found(format!("listing {}", id)))
    }
}

/// Outcome of loading a listings file
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ListingLoadReport {
    pub loaded: usize,
    pub skipped: usize,
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::listing::today;
    use crate::domain::User;
    use crate::services::UserService;

    fn service() -> (Arc<UserService>, ListingService) {
        let users = Arc::new(UserService::new());
        let listings = ListingService::new(users.clone());
        (users, listings)
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    fn fields(title: &str, owner: &str, keywords: &[&str]) -> ListingFields {
        ListingFields::new(
            title,
            "details",
            Decimal::new(25, 0),
            User::new(owner, "Owner").unwrap(),
            kw(keywords),
        )
    }

    fn post(service: &mut ListingService, title: &str, owner: &str, keywords: &[&str]) -> u32 {
        let listing = service
            .create_listing(None, fields(title, owner, keywords), false, None)
            .unwrap();
        let id = listing.id();
        service.add_listing(listing).unwrap();
        id
    }

    fn post_sale(service: &mut ListingService, title: &str, owner: &str, keywords: &[&str]) -> u32 {
        let expiry = today() + Duration::days(10);
        let listing = service
            .create_listing(None, fields(title, owner, keywords), true, Some(expiry))
            .unwrap();
        let id = listing.id();
        service.add_listing(listing).unwrap();
        id
    }

    #[test]
    fn test_create_listing_validation() {
        let (_, mut service) = service();

        let mut blank = fields("t", "a@x.com", &["k"]);
        blank.description = "  ".into();
        assert!(matches!(
            service.create_listing(None, blank, false, None),
            Err(Error::InvalidData(_))
        ));

        assert!(matches!(
            service.create_listing(None, fields("t", "a@x.com", &["k"]), true, None),
            Err(Error::InvalidData(_))
        ));

        let past = today() - Duration::days(1);
        assert!(matches!(
            service.create_listing(None, fields("t", "a@x.com", &["k"]), true, Some(past)),
            Err(Error::InvalidData(_))
        ));

        let listing = service
            .create_listing(Some(12), fields("t", "a@x.com", &["k"]), false, None)
            .unwrap();
        assert_eq!(listing.id(), 12);
        // Creating does not insert
        assert!(service.board().is_empty());
    }

    #[test]
    fn test_add_listing_rejects_duplicate_id() {
        let (_, mut service) = service();
        let id = post(&mut service, "bike", "a@x.com", &["bike"]);
        let again = service
            .create_listing(Some(id), fields("car", "b@x.com", &["car"]), false, None)
            .unwrap();
        assert!(matches!(service.add_listing(again), Err(Error::Board(_))));
    }

    #[test]
    fn test_remove_listing_checks_owner() {
        let (_, mut service) = service();
        let id = post(&mut service, "bike", "a@x.com", &["bike"]);

        assert!(matches!(
            service.remove_listing(id, "b@x.com"),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            service.remove_listing(id + 100, "a@x.com"),
            Err(Error::NotFound(_))
        ));
        assert!(service.remove_listing(id, "a@x.com").unwrap());
        assert!(service.find_by_id(id).is_none());
    }

    #[test]
    fn test_search_with_no_keywords_is_empty() {
        let (_, mut service) = service();
        post(&mut service, "bike", "a@x.com", &["bike"]);
        assert!(service.search_by_keywords(&[]).unwrap().is_empty());
        assert_eq!(service.search_by_keywords(&kw(&["bike"])).unwrap().len(), 1);
    }

    #[test]
    fn test_add_keywords_unions_in_order() {
        let (_, mut service) = service();
        let id = post(&mut service, "t", "a@x.com", &["x", "y"]);

        let listing = service.add_keywords(id, &kw(&["y", "z", "z"])).unwrap();
        assert_eq!(listing.keywords(), kw(&["x", "y", "z"]).as_slice());

        assert!(matches!(
            service.add_keywords(id, &kw(&["bad;word"])),
            Err(Error::InvalidData(_))
        ));
        assert_eq!(service.find_by_id(id).unwrap().keywords().len(), 3);

        assert!(matches!(
            service.add_keywords(999, &kw(&["a"])),
            Err(Error::Manager(_))
        ));
    }

    #[test]
    fn test_mark_sold_and_update_expiry() {
        let (_, mut service) = service();
        let sale = post_sale(&mut service, "lamp", "a@x.com", &["lamp"]);
        let wanted = post(&mut service, "sofa", "a@x.com", &["sofa"]);

        assert!(service.mark_sold(sale, "a@x.com", true).unwrap().is_sold());
        assert!(matches!(
            service.mark_sold(sale, "b@x.com", false),
            Err(Error::Unauthorized(_))
        ));
        assert!(matches!(
            service.mark_sold(wanted, "a@x.com", true),
            Err(Error::InvalidData(_))
        ));

        let later = today() + Duration::days(60);
        assert_eq!(
            service.update_expiry(sale, "a@x.com", later).unwrap().expiry_date(),
            Some(later)
        );
        assert!(matches!(
            service.update_expiry(sale, "a@x.com", today() - Duration::days(1)),
            Err(Error::InvalidData(_))
        ));
    }

    #[test]
    fn test_listings_by_owner() {
        let (_, mut service) = service();
        post(&mut service, "a1", "a@x.com", &["k"]);
        post(&mut service, "b1", "b@x.com", &["k"]);
        post(&mut service, "a2", "a@x.com", &["k"]);

        let titles: Vec<String> = service
            .listings_by_owner("a@x.com")
            .iter()
            .map(|l| l.title().to_string())
            .collect();
        assert_eq!(titles, vec!["a1", "a2"]);
    }

    #[test]
    fn test_purge_expired() {
        let (_, mut service) = service();
        post_sale(&mut service, "fresh", "a@x.com", &["k"]);
        post(&mut service, "wanted", "a@x.com", &["k"]);

        let input = "Classified Listings Buy/Sell\n\
                     1;old;d;5;a@x.com;k;2000-01-01;false\n\
                     2;fresh;d;5;a@x.com;k;2999-01-01\n";
        service.load_from_reader(input.as_bytes()).unwrap();

        assert_eq!(service.purge_expired(), 1);
        assert_eq!(service.purge_expired(), 0);
        assert_eq!(service.list_all().len(), 1);
    }

    #[test]
    fn test_related_sales_ignores_case() {
        let (_, mut service) = service();
        let wanted = post(&mut service, "want bike", "a@x.com", &["Bike"]);
        post_sale(&mut service, "road bike", "b@x.com", &["bike", "road"]);
        post_sale(&mut service, "sofa", "b@x.com", &["sofa"]);
        post(&mut service, "also want bike", "c@x.com", &["bike"]);

        let related = service.related_sales(wanted).unwrap();
        assert_eq!(related.len(), 1);
        assert_eq!(related[0].title(), "road bike");

        let sale_id = related[0].id();
        assert!(matches!(service.related_sales(sale_id), Err(Error::InvalidData(_))));
        assert!(matches!(service.related_sales(999), Err(Error::NotFound(_))));
    }

    #[test]
    fn test_load_skips_bad_rows_and_resets_ids() {
        let (users, mut service) = service();
        post(&mut service, "stale", "a@x.com", &["k"]);

        let input = "Classified Listings Buy/Sell\n\
                     3;Road bike;Barely used;120.5;a@x.com;bike;2000-01-01;true\n\
                     \n\
                     7;Want sofa;;40;new@x.com;sofa\n\
                     7;Dup;d;1;a@x.com;dup\n\
                     oops;bad;d;1;a@x.com;k\n\
                     ;No id;d;1;a@x.com;k\n\
                     9;No keywords;d;1;a@x.com;\n";
        let report = service.load_from_reader(input.as_bytes()).unwrap();

        assert_eq!(report, ListingLoadReport { loaded: 3, skipped: 3 });
        assert!(service.find_by_id(3).unwrap().is_expired());
        assert_eq!(service.find_by_id(8).unwrap().title(), "No id");
        assert_eq!(service.board().ids().peek(), 9);
        assert_eq!(users.find("new@x.com").unwrap().name(), "new@x.com");
    }

    #[test]
    fn test_load_requires_header() {
        let (_, mut service) = service();
        assert!(matches!(
            service.load_from_reader("".as_bytes()),
            Err(Error::Manager(_))
        ));
        assert!(matches!(
            service.load_from_reader("   \n1;t;d;1;a@x.com;k\n".as_bytes()),
            Err(Error::Manager(_))
        ));
    }

    #[test]
    fn test_blank_path_rejected() {
        let (_, mut service) = service();
        assert!(matches!(
            service.save_to_file(Path::new(" ")),
            Err(Error::InvalidArgument(_))
        ));
        assert!(matches!(
            service.load_from_file(Path::new("")),
            Err(Error::InvalidArgument(_))
        ));
    }

    #[test]
    fn test_load_skips_reserved_id() {
        let (_, mut service) = service();
        let input = "Classified Listings Buy/Sell\n\
                     4294967295;t;d;1;a@x.com;k\n";
        let report = service.load_from_reader(input.as_bytes()).unwrap();
        assert_eq!(report, ListingLoadReport { loaded: 0, skipped: 1 });
    }

    #[test]
    fn test_exhausted_ids_error_instead_of_panicking() {
        let (_, mut service) = service();
        let input = "Classified Listings Buy/Sell\n\
                     4294967294;t;d;1;a@x.com;k\n\
                     ;no id;d;1;a@x.com;k\n";
        let report = service.load_from_reader(input.as_bytes()).unwrap();
        assert_eq!(report, ListingLoadReport { loaded: 1, skipped: 1 });

        let err = service
            .create_listing(None, fields("t", "a@x.com", &["k"]), false, None)
            .unwrap_err();
        assert!(matches!(err, Error::Board(_)));
        assert_eq!(service.board().len(), 1);
    }

    #[test]
    fn test_add_keywords_trims_before_merging() {
        let (_, mut service) = service();
        let id = post(&mut service, "t", "a@x.com", &["x"]);
        let listing = service.add_keywords(id, &kw(&[" x ", "y "])).unwrap();
        assert_eq!(listing.keywords(), kw(&["x", "y"]).as_slice());
    }
}
