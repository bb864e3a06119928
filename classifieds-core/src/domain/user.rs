//! User domain model

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use super::result::{Error, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").expect("valid email regex")
});

/// A registered board user, identified by email
#[derive(Debug, Clone, Serialize)]
pub struct User {
    email: String,
    name: String,
}

impl User {
    /// Create a user, validating the email format and a non-blank name.
    /// The name is stored trimmed.
    pub fn new(email: impl Into<String>, name: impl Into<String>) -> Result<Self> {
        let email = email.into();
        let name = name.into();

        if !Self::is_valid_email(&email) {
            return Err(Error::invalid_data(format!("invalid email address: {}", email)));
        }
        let name = Self::validate_name(&name)?;

        Ok(Self { email, name })
    }

    pub fn email(&self) -> &str {
        &self.email
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Replace the name; a blank name is rejected and the old one kept
    pub fn set_name(&mut self, name: &str) -> Result<()> {
        self.name = Self::validate_name(name)?;
        Ok(())
    }

    pub fn is_valid_email(email: &str) -> bool {
        EMAIL_RE.is_match(email)
    }

    fn validate_name(name: &str) -> Result<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return Err(Error::invalid_data("user name must contain at least one character"));
        }
        Ok(trimmed.to_string())
    }
}

/// Users are the same user iff their emails match (case-sensitive)
impl PartialEq for User {
    fn eq(&self, other: &Self) -> bool {
        self.email == other.email
    }
}

impl Eq for User {}

impl std::hash::Hash for User {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.email.hash(state);
    }
}
