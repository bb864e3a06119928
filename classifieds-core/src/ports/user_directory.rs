//! User directory port
//!
//! The listing service resolves listing owners through this trait instead of
//! holding the user registry directly.

use crate::domain::result::Result;
use crate::domain::User;

/// Lookup and registration of board users, keyed by email
pub trait UserDirectory: Send + Sync {
    /// Find a registered user
    fn find_user(&self, email: &str) -> Option<User>;

    /// Register a new user; fails if the email is taken
    fn register(&self, user: User) -> Result<()>;

    /// Return the registered user for `email`, registering a placeholder
    /// whose name is the email when none exists yet
    fn find_or_register(&self, email: &str) -> Result<User> {
        if let Some(user) = self.find_user(email) {
            return Ok(user);
        }
        let user = User::new(email, email)?;
        self.register(user.clone())?;
        Ok(user)
    }
}
