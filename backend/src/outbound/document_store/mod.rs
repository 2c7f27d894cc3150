//! Document store client abstraction.
//!
//! A document store addresses whole records ("documents") by collection
//! name plus key and supports three operations: read, full replace, and
//! create-only-if-absent. Two clients are provided:
//!
//! - [`InMemoryDocumentStore`]: process-local maps, used for development and
//!   tests.
//! - [`FirestoreDocumentStore`]: Cloud Firestore over its REST API (or the
//!   Firestore emulator).
//!
//! One client instance is built at startup and shared by every request, so
//! implementations must be safe for concurrent use.

mod firestore;
mod memory;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::ports::define_port_error;

pub use firestore::{
    AccessTokenSource, ApplicationDefaultCredentials, FirestoreConfig, FirestoreDocumentStore,
    FirestoreSetupError, StaticToken,
};
pub use memory::InMemoryDocumentStore;

/// Field map of one stored document.
pub type Document = Map<String, Value>;

define_port_error! {
    /// Errors raised by document store clients.
    pub enum DocumentStoreError {
        /// The backend could not be reached or did not answer in time.
        Unavailable { message: String } => "document store unavailable: {message}",
        /// A create found a document already stored under the key.
        AlreadyExists { collection: String, key: String } =>
            "document {collection}/{key} already exists",
        /// The backend answered the request with a failure status.
        Rejected { status: u16, message: String } =>
            "document store rejected request ({status}): {message}",
        /// A document or response body could not be encoded or decoded.
        Decode { message: String } => "document store payload invalid: {message}",
    }
}

/// Key-addressed document backend.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Read the document stored under `collection/key`.
    ///
    /// Returns `Ok(None)` when no such document exists.
    async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, DocumentStoreError>;

    /// Write `document` under `collection/key`, replacing any stored fields.
    ///
    /// Backs [`crate::domain::ports::UserRepository::save`].
    async fn set(
        &self,
        collection: &str,
        key: &str,
        document: &Document,
    ) -> Result<(), DocumentStoreError>;

    /// Write `document` under `collection/key` only if the key is free.
    async fn create(
        &self,
        collection: &str,
        key: &str,
        document: &Document,
    ) -> Result<(), DocumentStoreError>;
}
