//! Service layer - business logic orchestration
//!
//! Services coordinate domain logic and port interactions. Each service
//! focuses on a specific use case or feature area.

use std::path::Path;

use crate::domain::result::{Error, Result};

mod listings;
mod users;

pub use listings::{ListingLoadReport, ListingService};
pub use users::{UserLoadReport, UserService};

/// Reject a blank data file path before touching the filesystem
pub(crate) fn ensure_path(path: &Path) -> Result<()> {
    if path.as_os_str().to_string_lossy().trim().is_empty() {
        return Err(Error::invalid_argument("file path cannot be empty"));
    }
    Ok(())
}
