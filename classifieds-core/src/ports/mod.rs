//! Port definitions (hexagonal architecture)
//!
//! Ports define the interfaces between services. The listing service depends
//! only on these traits, not on the concrete user registry.

mod user_directory;

pub use user_directory::UserDirectory;
