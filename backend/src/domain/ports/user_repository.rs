//! Port abstraction for user persistence adapters and their errors.
//!
//! The repository is the user entity's only route to the document store:
//! fetch by key, full-document replace, and create-only-if-absent.

use async_trait::async_trait;

use crate::domain::{User, UserId};

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by user repository adapters.
    pub enum UserPersistenceError {
        /// Repository connection could not be established or timed out.
        Connection { message: String } => "user repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } => "user repository query failed: {message}",
        /// A conditional insert found a record already stored under the key.
        AlreadyExists { id: String } => "user {id} already exists",
    }
}

/// Port for user storage and retrieval.
///
/// Implementations share one long-lived client across all in-flight
/// requests and must be safe for concurrent use.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Fetch a user by identifier.
    ///
    /// Returns `Ok(None)` only when no document is stored under `id`; every
    /// other backend failure is an error.
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError>;

    /// Write the full user document, replacing any stored version.
    ///
    /// Create goes through [`UserRepository::insert`] instead; this is the
    /// write the update route (`POST /{uuid}`, currently `501`) will use.
    async fn save(&self, user: &User) -> Result<(), UserPersistenceError>;

    /// Write the user document only if no document exists under its id.
    ///
    /// Fails with [`UserPersistenceError::AlreadyExists`] otherwise, leaving
    /// the stored document untouched.
    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn already_exists_names_the_identifier() {
        let error = UserPersistenceError::already_exists("a1");
        assert_eq!(error.to_string(), "user a1 already exists");
    }

    #[rstest]
    fn connection_error_formats_message() {
        let error = UserPersistenceError::connection("timed out");
        assert_eq!(
            error.to_string(),
            "user repository connection failed: timed out"
        );
    }
}
