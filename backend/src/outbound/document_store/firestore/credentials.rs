//! Bearer credentials for Firestore requests.
//!
//! Requests carry a token from an [`AccessTokenSource`]. A configured token is
//! sent as-is; otherwise Google application default credentials (a service
//! account key file, gcloud user credentials or the GCE metadata server) mint
//! short-lived tokens that `gcp_auth` caches and refreshes before expiry.

use std::sync::Arc;

use async_trait::async_trait;

use crate::outbound::document_store::DocumentStoreError;

/// OAuth2 scope covering the Firestore REST API.
pub const DATASTORE_SCOPE: &str = "https://www.googleapis.com/auth/datastore";

/// Supplies the bearer token attached to each Firestore request.
#[async_trait]
pub trait AccessTokenSource: Send + Sync {
    /// Current access token.
    ///
    /// Fails with [`DocumentStoreError::Unavailable`] when no token can be
    /// obtained, e.g. the metadata server did not answer.
    async fn access_token(&self) -> Result<String, DocumentStoreError>;
}

/// Fixed token taken from configuration.
pub struct StaticToken(String);

impl StaticToken {
    /// Wrap a pre-issued access token.
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }
}

#[async_trait]
impl AccessTokenSource for StaticToken {
    async fn access_token(&self) -> Result<String, DocumentStoreError> {
        Ok(self.0.clone())
    }
}

/// Tokens minted from Google application default credentials.
pub struct ApplicationDefaultCredentials {
    provider: Arc<dyn gcp_auth::TokenProvider>,
}

impl ApplicationDefaultCredentials {
    /// Discover credentials the way Google client libraries do.
    ///
    /// # Errors
    /// Returns the `gcp_auth` error when no credential source is usable.
    pub async fn discover() -> Result<Self, gcp_auth::Error> {
        Ok(Self {
            provider: gcp_auth::provider().await?,
        })
    }
}

#[async_trait]
impl AccessTokenSource for ApplicationDefaultCredentials {
    async fn access_token(&self) -> Result<String, DocumentStoreError> {
        let token = self
            .provider
            .token(&[DATASTORE_SCOPE])
            .await
            .map_err(|err| {
                DocumentStoreError::unavailable(format!("failed to obtain access token: {err}"))
            })?;
        Ok(token.as_str().to_owned())
    }
}
