//! Process-local document store.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;

use super::{Document, DocumentStore, DocumentStoreError};

type Collections = HashMap<String, HashMap<String, Document>>;

/// Document store backed by in-memory maps.
///
/// `create` checks for the key and inserts under a single write lock, so
/// concurrent creates for one key see exactly one success.
///
/// # Examples
/// ```
/// use users_backend::outbound::document_store::{Document, DocumentStore, InMemoryDocumentStore};
///
/// # tokio::runtime::Runtime::new().unwrap().block_on(async {
/// let store = InMemoryDocumentStore::new();
/// store.set("Users", "a1", &Document::new()).await.expect("set succeeds");
/// assert!(store.get("Users", "a1").await.expect("get succeeds").is_some());
/// # });
/// ```
#[derive(Debug, Default)]
pub struct InMemoryDocumentStore {
    collections: RwLock<Collections>,
}

impl InMemoryDocumentStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of documents held in `collection`.
    pub fn len(&self, collection: &str) -> Result<usize, DocumentStoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections.get(collection).map_or(0, HashMap::len))
    }
}

fn poisoned() -> DocumentStoreError {
    DocumentStoreError::unavailable("in-memory store lock poisoned")
}

#[async_trait]
impl DocumentStore for InMemoryDocumentStore {
    async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let collections = self.collections.read().map_err(|_| poisoned())?;
        Ok(collections
            .get(collection)
            .and_then(|documents| documents.get(key))
            .cloned())
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        document: &Document,
    ) -> Result<(), DocumentStoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        collections
            .entry(collection.to_owned())
            .or_default()
            .insert(key.to_owned(), document.clone());
        Ok(())
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        document: &Document,
    ) -> Result<(), DocumentStoreError> {
        let mut collections = self.collections.write().map_err(|_| poisoned())?;
        let documents = collections.entry(collection.to_owned()).or_default();
        if documents.contains_key(key) {
            return Err(DocumentStoreError::already_exists(collection, key));
        }
        documents.insert(key.to_owned(), document.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(count: i64) -> Document {
        let mut document = Document::new();
        document.insert("count".to_owned(), json!(count));
        document
    }

    #[tokio::test]
    async fn get_returns_none_for_missing_keys() {
        let store = InMemoryDocumentStore::new();
        let found = store.get("Users", "missing").await.expect("get succeeds");
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn set_replaces_whole_document() {
        let store = InMemoryDocumentStore::new();
        let mut first = document(1);
        first.insert("stale".to_owned(), json!(true));
        store.set("Users", "a1", &first).await.expect("first set");
        store.set("Users", "a1", &document(2)).await.expect("second set");

        let stored = store
            .get("Users", "a1")
            .await
            .expect("get succeeds")
            .expect("document stored");
        assert_eq!(stored, document(2));
    }

    #[tokio::test]
    async fn create_refuses_taken_keys_and_keeps_original() {
        let store = InMemoryDocumentStore::new();
        store.create("Users", "a1", &document(1)).await.expect("create");

        let error = store
            .create("Users", "a1", &document(2))
            .await
            .expect_err("second create fails");
        assert_eq!(error, DocumentStoreError::already_exists("Users", "a1"));

        let stored = store.get("Users", "a1").await.expect("get succeeds");
        assert_eq!(stored, Some(document(1)));
        assert_eq!(store.len("Users").expect("len"), 1);
    }

    #[tokio::test]
    async fn collections_are_isolated() {
        let store = InMemoryDocumentStore::new();
        store.create("Users", "a1", &document(1)).await.expect("create");
        store
            .create("Archive", "a1", &document(1))
            .await
            .expect("same key in another collection");
        assert!(store.get("Other", "a1").await.expect("get").is_none());
    }
}
