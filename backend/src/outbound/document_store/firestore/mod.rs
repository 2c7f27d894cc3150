//! Cloud Firestore document store client.
//!
//! Talks to the Firestore REST API (v1) directly with reqwest. Setting an
//! emulator host routes every request to a local Firestore emulator over
//! plain HTTP instead.

mod credentials;
mod dto;
mod rest_store;

pub use credentials::{AccessTokenSource, ApplicationDefaultCredentials, StaticToken};
pub use rest_store::{FirestoreConfig, FirestoreDocumentStore, FirestoreSetupError};
