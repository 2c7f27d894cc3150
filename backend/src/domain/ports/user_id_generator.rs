//! Port for allocating identifiers for users created without one.

use crate::domain::UserId;

use super::define_port_error;

define_port_error! {
    /// Errors raised while allocating a user identifier.
    pub enum UserIdAllocationError {
        /// The randomness source could not supply bytes.
        Entropy { message: String } => "user id allocation failed: {message}",
    }
}

/// Source of fresh, collision-improbable user identifiers.
#[cfg_attr(test, mockall::automock)]
pub trait UserIdGenerator: Send + Sync {
    /// Allocate a new identifier.
    fn allocate(&self) -> Result<UserId, UserIdAllocationError>;
}
