//! `UserRepository` implementation over a [`DocumentStore`].
//!
//! Users live in the `Users` collection, keyed by their identifier, with the
//! same `{"uuid", "count"}` shape they have on the wire.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tracing::debug;

use crate::domain::ports::{UserPersistenceError, UserRepository};
use crate::domain::{User, UserId};
use crate::outbound::document_store::{Document, DocumentStore, DocumentStoreError};

/// Collection holding one document per user.
pub const USERS_COLLECTION: &str = "Users";

/// Document-backed implementation of the [`UserRepository`] port.
pub struct DocumentUserRepository<S: ?Sized> {
    store: Arc<S>,
}

impl<S: ?Sized> Clone for DocumentUserRepository<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ?Sized + DocumentStore> DocumentUserRepository<S> {
    /// Create a repository over a shared store client.
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }
}

fn map_store_error(error: DocumentStoreError) -> UserPersistenceError {
    debug!(%error, "document store operation failed");
    match error {
        DocumentStoreError::Unavailable { message } => UserPersistenceError::connection(message),
        DocumentStoreError::AlreadyExists { key, .. } => UserPersistenceError::already_exists(key),
        DocumentStoreError::Rejected { status, message } => {
            UserPersistenceError::query(format!("status {status}: {message}"))
        }
        DocumentStoreError::Decode { message } => UserPersistenceError::query(message),
    }
}

fn to_document(user: &User) -> Result<Document, UserPersistenceError> {
    match serde_json::to_value(user) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(other) => Err(UserPersistenceError::query(format!(
            "user encoded as non-object value: {other}"
        ))),
        Err(err) => Err(UserPersistenceError::query(format!(
            "failed to encode user: {err}"
        ))),
    }
}

fn from_document(id: &UserId, document: Document) -> Result<User, UserPersistenceError> {
    serde_json::from_value(Value::Object(document)).map_err(|err| {
        UserPersistenceError::query(format!("stored user {id} is malformed: {err}"))
    })
}

#[async_trait]
impl<S: ?Sized + DocumentStore> UserRepository for DocumentUserRepository<S> {
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserPersistenceError> {
        let document = self
            .store
            .get(USERS_COLLECTION, id.as_ref())
            .await
            .map_err(map_store_error)?;
        document.map(|fields| from_document(id, fields)).transpose()
    }

    async fn save(&self, user: &User) -> Result<(), UserPersistenceError> {
        let document = to_document(user)?;
        self.store
            .set(USERS_COLLECTION, user.id().as_ref(), &document)
            .await
            .map_err(map_store_error)
    }

    async fn insert(&self, user: &User) -> Result<(), UserPersistenceError> {
        let document = to_document(user)?;
        self.store
            .create(USERS_COLLECTION, user.id().as_ref(), &document)
            .await
            .map_err(map_store_error)
    }
}
