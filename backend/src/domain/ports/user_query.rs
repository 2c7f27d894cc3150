//! Driving port for user lookups.

use async_trait::async_trait;

use crate::domain::{Error, User, UserId};

/// Domain use-case port for fetching users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserQuery: Send + Sync {
    /// Fetch the stored user with the given identifier.
    async fn fetch(&self, id: &UserId) -> Result<User, Error>;
}
