//! Adapter implementations
//!
//! Adapters own the on-disk formats:
//! - Semicolon-delimited text file for listings
//! - CSV file for users

pub mod listing_file;
pub mod users_csv;
