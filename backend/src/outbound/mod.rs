//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **document_store**: key-addressed document clients (Firestore REST and
//!   an in-memory map)
//! - **persistence**: repositories translating users to stored documents
//! - **ids**: random user identifier allocation
//!
//! Adapters are thin translators that convert between domain types and
//! infrastructure-specific representations. They contain no business logic.

pub mod document_store;
pub mod ids;
pub mod persistence;
