//! Driving port for user creation.
//!
//! Inbound adapters use this port to create users without importing
//! outbound persistence concerns.

use async_trait::async_trait;

use crate::domain::{Error, NewUser, User};

/// Domain use-case port for creating users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserCommand: Send + Sync {
    /// Create a user, allocating an identifier when none was supplied.
    ///
    /// Rejects the request with [`crate::domain::ErrorCode::Forbidden`] when
    /// a user with the resolved identifier already exists.
    async fn create(&self, request: NewUser) -> Result<User, Error>;
}
