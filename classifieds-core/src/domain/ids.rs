//! Listing id allocation

use super::result::{Error, Result};

/// Monotonic listing id counter owned by a single board.
///
/// Fresh listings take `allocate()`. Listings restored with an explicit id call
/// `observe()` so later allocations never collide with them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdSequence {
    next: u32,
}

impl IdSequence {
    pub const FIRST: u32 = 1;

    /// Largest id a listing may carry. Keeping `u32::MAX` out of use lets
    /// the counter always hold "one past the last id".
    pub const MAX: u32 = u32::MAX - 1;

    pub fn new() -> Self {
        Self { next: Self::FIRST }
    }

    /// Take the next id; fails once every id up to `MAX` has been handed out
    pub fn allocate(&mut self) -> Result<u32> {
        let id = self.available()?;
        self.next = id + 1;
        Ok(id)
    }

    /// The id the next call to `allocate()` will return
    pub fn peek(&self) -> u32 {
        self.next
    }

    /// Like `peek`, but errors when the sequence is exhausted
    pub fn available(&self) -> Result<u32> {
        if self.next > Self::MAX {
            return Err(Error::board("listing ids exhausted"));
        }
        Ok(self.next)
    }

    /// Check that an externally supplied id is in range
    pub fn validate(id: u32) -> Result<()> {
        if id > Self::MAX {
            return Err(Error::invalid_data(format!(
                "listing id {} is larger than {}",
                id,
                Self::MAX
            )));
        }
        Ok(())
    }

    /// Advance past an externally supplied id
    pub fn observe(&mut self, id: u32) {
        if id >= self.next {
            self.next = id.saturating_add(1);
        }
    }

    /// Restart the sequence at `next`
    pub fn reset_to(&mut self, next: u32) {
        self.next = next;
    }

    pub fn reset(&mut self) {
        self.reset_to(Self::FIRST);
    }
}

impl Default for IdSequence {
    fn default() -> Self {
        Self::new()
    }
}
