//! Core domain entities
//!
//! All business entities are defined here. These are pure data structures
//! with validation logic - no I/O or external dependencies.

mod board;
mod ids;
pub mod listing;
pub mod result;
mod user;

pub use board::Board;
pub use ids::IdSequence;
pub use listing::{Listing, ListingFields, ListingKind, DEFAULT_DESCRIPTION};
pub use user::User;
