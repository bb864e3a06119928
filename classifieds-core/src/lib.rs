//! Classifieds Core - Business logic for a classified-ads bulletin board
//!
//! This crate implements the core domain logic following hexagonal architecture:
//!
//! - **domain**: Core business entities (Listing, Board, User)
//! - **ports**: Trait definitions for dependencies between services (UserDirectory)
//! - **services**: Business logic orchestration
//! - **adapters**: On-disk file formats (listings text file, users CSV)

pub mod domain;
pub mod ports;
pub mod services;
pub mod adapters;
pub mod config;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;

use config::Config;
use services::{ListingService, UserService};

// Re-export commonly used types at crate root
pub use domain::{Board, IdSequence, Listing, ListingFields, ListingKind, User, DEFAULT_DESCRIPTION};
pub use domain::result::{Error, Result};
pub use services::{ListingLoadReport, UserLoadReport};

/// Main context for board operations
///
/// This is the primary entry point for front ends. It holds the
/// configuration, the user registry and the listing service.
pub struct ClassifiedsContext {
    pub config: Config,
    pub data_dir: PathBuf,
    pub users: Arc<UserService>,
    pub listings: ListingService,
}

impl ClassifiedsContext {
    /// Create a new context, loading any data files already in `data_dir`
    pub fn new(data_dir: &Path) -> anyhow::Result<Self> {
        let config = Config::load(data_dir)?;

        let users = Arc::new(UserService::new());
        let listings = ListingService::new(Arc::clone(&users) as Arc<dyn ports::UserDirectory>);

        let mut context = Self {
            config,
            data_dir: data_dir.to_path_buf(),
            users,
            listings,
        };

        // Users first so listing owners resolve to their real names
        let users_path = context.users_path();
        if users_path.exists() {
            context
                .users
                .load_from_file(&users_path)
                .with_context(|| format!("Failed to load users from {}", users_path.display()))?;
        }

        let listings_path = context.listings_path();
        if listings_path.exists() {
            context
                .listings
                .load_from_file(&listings_path)
                .with_context(|| {
                    format!("Failed to load listings from {}", listings_path.display())
                })?;
        }

        Ok(context)
    }

    pub fn listings_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.listings_file)
    }

    pub fn users_path(&self) -> PathBuf {
        self.data_dir.join(&self.config.users_file)
    }

    /// Write both data files, creating the data directory if needed
    pub fn persist(&self) -> anyhow::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
            .with_context(|| format!("Failed to create {}", self.data_dir.display()))?;
        self.users.save_to_file(&self.users_path())?;
        self.listings.save_to_file(&self.listings_path())?;
        Ok(())
    }
}
