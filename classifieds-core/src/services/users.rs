//! User service - the registry of board users

use std::fs::File;
use std::io::{BufReader, BufWriter, Read};
use std::path::Path;

use parking_lot::Mutex;
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::adapters::users_csv;
use crate::domain::result::{Error, Result};
use crate::domain::User;
use crate::ports::UserDirectory;

use super::ensure_path;

/// Registered users, in registration order, unique by email.
///
/// Shared between the listing service and front ends, so every method
/// takes `&self`.
#[derive(Debug, Default)]
pub struct UserService {
    users: Mutex<Vec<User>>,
}

impl UserService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user; fails if the email is already registered
    pub fn add(&self, user: User) -> Result<()> {
        let mut users = self.users.lock();
        if users.iter().any(|u| u.email() == user.email()) {
            return Err(Error::DuplicateUser(user.email().to_string()));
        }
        debug!(email = user.email(), "registered user");
        users.push(user);
        Ok(())
    }

    /// Remove the user with `email`. Their listings stay on the board.
    pub fn remove(&self, email: &str) -> bool {
        let mut users = self.users.lock();
        match users.iter().position(|u| u.email() == email) {
            Some(index) => {
                users.remove(index);
                debug!(email, "removed user");
                true
            }
            None => false,
        }
    }

    pub fn find(&self, email: &str) -> Option<User> {
        self.users.lock().iter().find(|u| u.email() == email).cloned()
    }

    /// Snapshot of all users; changing it does not affect the registry
    pub fn list(&self) -> Vec<User> {
        self.users.lock().clone()
    }

    pub fn len(&self) -> usize {
        self.users.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.lock().is_empty()
    }

    /// Change a registered user's display name
    pub fn rename(&self, email: &str, name: &str) -> Result<User> {
        let mut users = self.users.lock();
        let user = users
            .iter_mut()
            .find(|u| u.email() == email)
            .ok_or_else(|| Error::not_found(format!("user {}", email)))?;
        user.set_name(name)?;
        Ok(user.clone())
    }

    /// Write all users to a CSV file
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        ensure_path(path)?;
        let file = File::create(path)
            .map_err(|e| Error::io(format!("creating {}", path.display()), e))?;
        let users = self.list();
        users_csv::write_users(BufWriter::new(file), &users)?;
        info!(path = %path.display(), count = users.len(), "saved users");
        Ok(())
    }

    /// Replace the registry with the users in a CSV file
    pub fn load_from_file(&self, path: &Path) -> Result<UserLoadReport> {
        ensure_path(path)?;
        let file = File::open(path)
            .map_err(|e| Error::io(format!("opening {}", path.display()), e))?;
        let report = self.load_from_reader(BufReader::new(file))?;
        info!(
            path = %path.display(),
            loaded = report.loaded,
            skipped = report.skipped,
            "loaded users"
        );
        Ok(report)
    }

    /// Replace the registry with the users read from `reader`.
    ///
    /// Rows that are malformed or repeat an email are skipped. The registry
    /// is only touched once the whole input has been read.
    pub fn load_from_reader<R: Read>(&self, reader: R) -> Result<UserLoadReport> {
        let parsed = users_csv::read_users(reader)?;
        let mut skipped = parsed.skipped;

        let mut users: Vec<User> = Vec::with_capacity(parsed.users.len());
        for user in parsed.users {
            if users.contains(&user) {
                warn!(email = user.email(), "skipping duplicate user row");
                skipped += 1;
                continue;
            }
            users.push(user);
        }

        let loaded = users.len();
        *self.users.lock() = users;
        Ok(UserLoadReport { loaded, skipped })
    }
}

impl UserDirectory for UserService {
    fn find_user(&self, email: &str) -> Option<User> {
        self.find(email)
    }

    fn register(&self, user: User) -> Result<()> {
        self.add(user)
    }
}

/// Outcome of loading a users file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct UserLoadReport {
    pub loaded: usize,
    pub skipped: usize,
}
