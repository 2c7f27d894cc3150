//! User lifecycle service.
//!
//! Implements the create and fetch use-cases on top of the repository and
//! identifier ports. Creation is idempotent in the rejecting sense: a second
//! create for an identifier that is already stored fails instead of
//! overwriting the record.
//!
//! The existence check is followed by a conditional insert rather than a
//! blind write, so two concurrent creates for the same identifier resolve to
//! exactly one success and one rejection.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;
use tracing::{error, info, warn};

use crate::domain::ports::{
    UserCommand, UserIdGenerator, UserPersistenceError, UserQuery, UserRepository,
};
use crate::domain::{Error, NewUser, User, UserId};

/// User service implementing the driving ports.
#[derive(Clone)]
pub struct UserService<R, G> {
    repository: Arc<R>,
    ids: Arc<G>,
}

impl<R, G> UserService<R, G> {
    /// Create a new service over the given repository and id generator.
    pub fn new(repository: Arc<R>, ids: Arc<G>) -> Self {
        Self { repository, ids }
    }
}

impl<R, G> UserService<R, G>
where
    R: UserRepository,
    G: UserIdGenerator,
{
    fn user_exists(id: &UserId) -> Error {
        Error::forbidden(format!("user {id} already exists"))
            .with_details(json!({ "code": "user_exists", "uuid": id.as_ref() }))
    }

    fn user_not_found() -> Error {
        Error::not_found("user not found")
    }

    fn resolve_id(&self, request: &NewUser) -> Result<UserId, Error> {
        if let Some(raw) = request.requested_id() {
            return UserId::new(raw).map_err(|err| {
                warn!(error = %err, "rejected supplied user id");
                Error::internal(format!("failed to decode user: {err}"))
                    .with_details(json!({ "code": "user_decode_failed" }))
            });
        }

        let id = self.ids.allocate().map_err(|err| {
            error!(error = %err, "user id allocation failed");
            Error::internal(format!("failed to allocate user id: {err}"))
                .with_details(json!({ "code": "id_allocation_failed" }))
        })?;
        info!(user_id = %id, "allocated user id");
        Ok(id)
    }

    async fn ensure_absent(&self, id: &UserId) -> Result<(), Error> {
        match self.repository.find_by_id(id).await {
            Ok(None) => Ok(()),
            Ok(Some(_)) => {
                info!(user_id = %id, "user already exists");
                Err(Self::user_exists(id))
            }
            Err(err) => {
                error!(user_id = %id, error = %err, "user existence check failed");
                Err(Error::service_unavailable("user store unavailable"))
            }
        }
    }

    async fn insert(&self, user: &User) -> Result<(), Error> {
        match self.repository.insert(user).await {
            Ok(()) => Ok(()),
            Err(UserPersistenceError::AlreadyExists { .. }) => {
                warn!(user_id = %user.id(), "user created concurrently");
                Err(Self::user_exists(user.id()))
            }
            Err(err) => {
                error!(user_id = %user.id(), error = %err, "create user failed");
                Err(Error::internal(format!("failed to persist user: {err}"))
                    .with_details(json!({ "code": "user_persist_failed" })))
            }
        }
    }
}

#[async_trait]
impl<R, G> UserCommand for UserService<R, G>
where
    R: UserRepository,
    G: UserIdGenerator,
{
    async fn create(&self, request: NewUser) -> Result<User, Error> {
        let id = self.resolve_id(&request)?;
        self.ensure_absent(&id).await?;

        let user = request.into_user(id);
        self.insert(&user).await?;
        info!(user_id = %user.id(), "created user");
        Ok(user)
    }
}

#[async_trait]
impl<R, G> UserQuery for UserService<R, G>
where
    R: UserRepository,
    G: UserIdGenerator,
{
    async fn fetch(&self, id: &UserId) -> Result<User, Error> {
        match self.repository.find_by_id(id).await {
            Ok(Some(user)) => Ok(user),
            Ok(None) => {
                info!(user_id = %id, "user not found");
                Err(Self::user_not_found())
            }
            Err(err) => {
                warn!(user_id = %id, error = %err, "user lookup failed");
                Err(Self::user_not_found())
            }
        }
    }
}

#[cfg(test)]
#[path = "user_service_tests.rs"]
mod tests;
