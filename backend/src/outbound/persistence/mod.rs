//! Document-store persistence adapters.
//!
//! Repository implementations here only translate between domain types and
//! stored documents. No business logic resides here; the existence check
//! that precedes a create belongs to the domain service.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//!
//! use users_backend::outbound::document_store::InMemoryDocumentStore;
//! use users_backend::outbound::persistence::DocumentUserRepository;
//!
//! let repo = DocumentUserRepository::new(Arc::new(InMemoryDocumentStore::new()));
//! # let _ = repo;
//! ```

mod document_user_repository;

pub use document_user_repository::{DocumentUserRepository, USERS_COLLECTION};
