//! Board - the ordered in-memory collection of listings

use super::ids::IdSequence;
use super::listing::Listing;
use super::result::{Error, Result};
use super::user::User;

/// All active listings of one catalog, in insertion order.
///
/// The board also owns the catalog's id sequence: clearing the board
/// restarts id allocation at 1.
#[derive(Debug, Default)]
pub struct Board {
    listings: Vec<Listing>,
    ids: IdSequence,
}

impl Board {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id allocator for listings destined for this board
    pub fn ids_mut(&mut self) -> &mut IdSequence {
        &mut self.ids
    }

    pub fn ids(&self) -> &IdSequence {
        &self.ids
    }

    /// Append a listing. Rejected if a listing with the same id is already
    /// present, whatever its other fields.
    pub fn add(&mut self, listing: Listing) -> Result<()> {
        if self.listings.iter().any(|l| l.id() == listing.id()) {
            return Err(Error::board(format!(
                "a listing with id {} is already on the board",
                listing.id()
            )));
        }
        self.listings.push(listing);
        Ok(())
    }

    /// Remove the listing with `id` if it belongs to `owner`.
    /// Returns whether anything was removed.
    pub fn remove_by_id_and_owner(&mut self, id: u32, owner: &User) -> bool {
        match self
            .listings
            .iter()
            .position(|l| l.id() == id && l.owner() == owner)
        {
            Some(index) => {
                self.listings.remove(index);
                true
            }
            None => false,
        }
    }

    /// Remove every listing equal to one in `listings`, without any
    /// ownership check. Returns whether anything was removed.
    pub fn remove_all(&mut self, listings: &[Listing]) -> bool {
        if listings.is_empty() {
            return false;
        }
        let before = self.listings.len();
        self.listings.retain(|l| !listings.contains(l));
        self.listings.len() != before
    }

    /// Listings carrying at least one of `keywords` (exact, case-sensitive).
    ///
    /// Each listing appears once, in board order.
    pub fn search_by_keywords(&self, keywords: &[String]) -> Result<Vec<Listing>> {
        if keywords.is_empty() {
            return Err(Error::board("keyword list cannot be empty"));
        }
        Ok(self
            .listings
            .iter()
            .filter(|l| keywords.iter().any(|k| l.contains_keyword(k)))
            .cloned()
            .collect())
    }

    /// Empty the board and restart the id sequence
    pub fn clear(&mut self) {
        self.listings.clear();
        self.ids.reset();
    }

    pub fn find(&self, id: u32) -> Option<&Listing> {
        self.listings.iter().find(|l| l.id() == id)
    }

    pub(crate) fn find_mut(&mut self, id: u32) -> Option<&mut Listing> {
        self.listings.iter_mut().find(|l| l.id() == id)
    }

    /// Point-in-time copy of every listing, in insertion order
    pub fn list_all(&self) -> Vec<Listing> {
        self.listings.clone()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Listing> {
        self.listings.iter()
    }

    pub fn len(&self) -> usize {
        self.listings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}

impl<'a> IntoIterator for &'a Board {
    type Item = &'a Listing;
    type IntoIter = std::slice::Iter<'a, Listing>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::domain::listing::{ListingFields, ListingKind};

    fn user(email: &str) -> User {
        User::new(email, "Someone").unwrap()
    }

    fn purchase(board: &mut Board, title: &str, owner: &User, keywords: &[&str]) -> Listing {
        Listing::new(
            board.ids_mut(),
            ListingFields::new(
                title,
                "",
                Decimal::new(10, 0),
                owner.clone(),
                keywords.iter().map(|k| k.to_string()).collect(),
            ),
            ListingKind::Purchase,
        )
        .unwrap()
    }

    fn kw(words: &[&str]) -> Vec<String> {
        words.iter().map(|w| w.to_string()).collect()
    }

    #[test]
    fn test_add_preserves_insertion_order() {
        let mut board = Board::new();
        let owner = user("a@x.com");
        for title in ["first", "second", "third"] {
            let listing = purchase(&mut board, title, &owner, &["k"]);
            board.add(listing).unwrap();
        }
        let titles: Vec<&str> = board.iter().map(|l| l.title()).collect();
        assert_eq!(titles, vec!["first", "second", "third"]);
        assert_eq!(board.len(), 3);
    }

    #[test]
    fn test_add_rejects_duplicate_id_even_with_different_fields() {
        let mut board = Board::new();
        let owner = user("a@x.com");
        let first = purchase(&mut board, "bike", &owner, &["bike"]);
        let id = first.id();
        board.add(first).unwrap();

        let other = Listing::with_id(
            board.ids_mut(),
            id,
            ListingFields::new("car", "fast", Decimal::new(999, 0), user("b@x.com"), kw(&["car"])),
            ListingKind::Purchase,
        )
        .unwrap();
        assert!(matches!(board.add(other), Err(Error::Board(_))));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_remove_by_id_and_owner() {
        let mut board = Board::new();
        let alice = user("a@x.com");
        let bob = user("b@x.com");
        let listing = purchase(&mut board, "bike", &alice, &["bike"]);
        let id = listing.id();
        board.add(listing).unwrap();

        assert!(!board.remove_by_id_and_owner(id, &bob));
        assert!(!board.remove_by_id_and_owner(id + 1, &alice));
        assert_eq!(board.len(), 1);

        assert!(board.remove_by_id_and_owner(id, &alice));
        assert!(board.is_empty());
    }

    #[test]
    fn test_remove_all() {
        let mut board = Board::new();
        let owner = user("a@x.com");
        let a = purchase(&mut board, "a", &owner, &["a"]);
        let b = purchase(&mut board, "b", &owner, &["b"]);
        board.add(a.clone()).unwrap();
        board.add(b).unwrap();

        assert!(!board.remove_all(&[]));
        assert!(board.remove_all(&[a.clone()]));
        assert!(!board.remove_all(&[a]));
        assert_eq!(board.len(), 1);
    }

    #[test]
    fn test_search_is_logical_or_without_duplicates() {
        let mut board = Board::new();
        let owner = user("a@x.com");
        let bike = purchase(&mut board, "bike", &owner, &["bike", "sport"]);
        let ski = purchase(&mut board, "ski", &owner, &["sport", "winter"]);
        let sofa = purchase(&mut board, "sofa", &owner, &["home"]);
        for l in [bike, ski, sofa] {
            board.add(l).unwrap();
        }

        let found = board.search_by_keywords(&kw(&["sport", "bike"])).unwrap();
        let titles: Vec<&str> = found.iter().map(|l| l.title()).collect();
        assert_eq!(titles, vec!["bike", "ski"]);

        assert!(board.search_by_keywords(&kw(&["Sport"])).unwrap().is_empty());
        assert!(board.search_by_keywords(&kw(&["boat"])).unwrap().is_empty());
    }

    #[test]
    fn test_search_rejects_empty_keywords() {
        let board = Board::new();
        assert!(matches!(board.search_by_keywords(&[]), Err(Error::Board(_))));
    }

    #[test]
    fn test_clear_resets_ids() {
        let mut board = Board::new();
        let owner = user("a@x.com");
        for _ in 0..3 {
            let l = purchase(&mut board, "t", &owner, &["k"]);
            board.add(l).unwrap();
        }
        assert_eq!(board.ids().peek(), 4);

        board.clear();
        assert!(board.is_empty());
        assert_eq!(board.ids().peek(), 1);
    }

    #[test]
    fn test_list_all_is_a_snapshot() {
        let mut board = Board::new();
        let owner = user("a@x.com");
        let l = purchase(&mut board, "t", &owner, &["k"]);
        board.add(l).unwrap();

        let mut snapshot = board.list_all();
        snapshot.clear();
        assert_eq!(board.len(), 1);
        assert_eq!((&board).into_iter().count(), 1);
    }
}
