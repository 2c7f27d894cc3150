//! Reqwest-backed Firestore REST client.
//!
//! This adapter owns transport details only: URL construction, bearer
//! authentication, timeout and HTTP status mapping, and the typed-value codec
//! in [`super::dto`].

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode, Url};
use thiserror::Error;

use super::credentials::{AccessTokenSource, ApplicationDefaultCredentials, StaticToken};
use super::dto::{
    FirestoreDocumentDto, FirestoreErrorEnvelope, FirestoreWriteDto, decode_fields, encode_fields,
};
use crate::outbound::document_store::{Document, DocumentStore, DocumentStoreError};

const FIRESTORE_API_BASE: &str = "https://firestore.googleapis.com";
/// Database identifier Firestore assigns to a project's first database.
pub const DEFAULT_DATABASE_ID: &str = "(default)";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for [`FirestoreDocumentStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirestoreConfig {
    /// Google Cloud project owning the database.
    pub project_id: String,
    /// Firestore database identifier within the project.
    pub database_id: String,
    /// `host:port` of a Firestore emulator; requests use plain HTTP when set.
    pub emulator_host: Option<String>,
    /// OAuth2 access token sent as a bearer credential. When absent outside
    /// the emulator, tokens come from application default credentials.
    pub access_token: Option<String>,
    /// Per-request timeout.
    pub timeout: Duration,
}

impl FirestoreConfig {
    /// Settings for the default database of `project_id`.
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            database_id: DEFAULT_DATABASE_ID.to_owned(),
            emulator_host: None,
            access_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Base URL of the `documents` resource for the configured database.
    pub fn documents_url(&self) -> Result<Url, FirestoreSetupError> {
        let api_base = match &self.emulator_host {
            Some(host) => format!("http://{host}"),
            None => FIRESTORE_API_BASE.to_owned(),
        };
        let mut url = Url::parse(&api_base).map_err(|err| FirestoreSetupError::Endpoint {
            message: format!("{api_base}: {err}"),
        })?;
        url.path_segments_mut()
            .map_err(|()| FirestoreSetupError::Endpoint {
                message: format!("{api_base} cannot carry a path"),
            })?
            .extend([
                "v1",
                "projects",
                self.project_id.as_str(),
                "databases",
                self.database_id.as_str(),
                "documents",
            ]);
        Ok(url)
    }
}

/// Errors raised while building the Firestore client at startup.
#[derive(Debug, Error)]
pub enum FirestoreSetupError {
    /// The API endpoint could not be formed from the settings.
    #[error("invalid Firestore endpoint: {message}")]
    Endpoint { message: String },
    /// The HTTP client could not be constructed.
    #[error("failed to build Firestore HTTP client: {0}")]
    Client(#[from] reqwest::Error),
    /// No application default credentials could be found.
    #[error("failed to load Google credentials: {0}")]
    Credentials(#[from] gcp_auth::Error),
}

/// Document store backed by Cloud Firestore.
///
/// The underlying reqwest client pools connections and is shared by every
/// request; it is never closed per call.
pub struct FirestoreDocumentStore {
    client: Client,
    documents_url: Url,
    token_source: Option<Arc<dyn AccessTokenSource>>,
}

impl FirestoreDocumentStore {
    /// Build a client for the configured database.
    ///
    /// A configured access token is sent with every request. Otherwise the
    /// emulator is addressed without credentials and the production API with
    /// tokens from application default credentials.
    ///
    /// # Errors
    ///
    /// Returns [`FirestoreSetupError`] when the endpoint is malformed, the
    /// HTTP client cannot be constructed or no credentials are available.
    pub async fn connect(config: FirestoreConfig) -> Result<Self, FirestoreSetupError> {
        let token_source: Option<Arc<dyn AccessTokenSource>> =
            match (&config.access_token, &config.emulator_host) {
                (Some(token), _) => Some(Arc::new(StaticToken::new(token.clone()))),
                (None, Some(_)) => None,
                (None, None) => Some(Arc::new(ApplicationDefaultCredentials::discover().await?)),
            };
        Self::build(config, token_source)
    }

    /// Build a client that authorises requests with `token_source`, ignoring
    /// any configured access token.
    ///
    /// # Errors
    ///
    /// Returns [`FirestoreSetupError`] when the endpoint is malformed or the
    /// HTTP client cannot be constructed.
    pub fn with_token_source(
        config: FirestoreConfig,
        token_source: Arc<dyn AccessTokenSource>,
    ) -> Result<Self, FirestoreSetupError> {
        Self::build(config, Some(token_source))
    }

    fn build(
        config: FirestoreConfig,
        token_source: Option<Arc<dyn AccessTokenSource>>,
    ) -> Result<Self, FirestoreSetupError> {
        let documents_url = config.documents_url()?;
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            documents_url,
            token_source,
        })
    }

    fn collection_url(&self, collection: &str) -> Url {
        let mut url = self.documents_url.clone();
        // http(s) base URLs always accept path segments.
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(collection);
        }
        url
    }

    fn document_url(&self, collection: &str, key: &str) -> Url {
        let mut url = self.collection_url(collection);
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.push(key);
        }
        url
    }

    async fn authorise(
        &self,
        request: RequestBuilder,
    ) -> Result<RequestBuilder, DocumentStoreError> {
        match &self.token_source {
            Some(source) => Ok(request.bearer_auth(source.access_token().await?)),
            None => Ok(request),
        }
    }

    fn write_body(document: &Document) -> Result<FirestoreWriteDto, DocumentStoreError> {
        Ok(FirestoreWriteDto {
            fields: encode_fields(document)?,
        })
    }
}

#[async_trait]
impl DocumentStore for FirestoreDocumentStore {
    async fn get(
        &self,
        collection: &str,
        key: &str,
    ) -> Result<Option<Document>, DocumentStoreError> {
        let response = self
            .authorise(self.client.get(self.document_url(collection, key)))
            .await?
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(map_status_error(status, body.as_ref()));
        }

        let document: FirestoreDocumentDto = serde_json::from_slice(&body).map_err(|err| {
            DocumentStoreError::decode(format!("invalid Firestore document payload: {err}"))
        })?;
        decode_fields(document.fields).map(Some)
    }

    async fn set(
        &self,
        collection: &str,
        key: &str,
        document: &Document,
    ) -> Result<(), DocumentStoreError> {
        // A patch without an update mask replaces every field.
        let body = Self::write_body(document)?;
        let response = self
            .authorise(self.client.patch(self.document_url(collection, key)))
            .await?
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }

    async fn create(
        &self,
        collection: &str,
        key: &str,
        document: &Document,
    ) -> Result<(), DocumentStoreError> {
        let body = Self::write_body(document)?;
        let response = self
            .authorise(self.client.post(self.collection_url(collection)))
            .await?
            .query(&[("documentId", key)])
            .json(&body)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        if status.is_success() {
            return Ok(());
        }
        if status == StatusCode::CONFLICT {
            return Err(DocumentStoreError::already_exists(collection, key));
        }
        let body = response.bytes().await.map_err(map_transport_error)?;
        Err(map_status_error(status, body.as_ref()))
    }
}

fn map_transport_error(error: reqwest::Error) -> DocumentStoreError {
    if error.is_timeout() {
        DocumentStoreError::unavailable(format!("request timed out: {error}"))
    } else {
        DocumentStoreError::unavailable(error.to_string())
    }
}

fn map_status_error(status: StatusCode, body: &[u8]) -> DocumentStoreError {
    let message = match serde_json::from_slice::<FirestoreErrorEnvelope>(body) {
        Ok(envelope) if !envelope.error.status.is_empty() => {
            format!("{}: {}", envelope.error.status, envelope.error.message)
        }
        Ok(envelope) => envelope.error.message,
        Err(_) => body_preview(body),
    };

    match status {
        StatusCode::TOO_MANY_REQUESTS
        | StatusCode::REQUEST_TIMEOUT
        | StatusCode::BAD_GATEWAY
        | StatusCode::SERVICE_UNAVAILABLE
        | StatusCode::GATEWAY_TIMEOUT => {
            DocumentStoreError::unavailable(format!("status {}: {message}", status.as_u16()))
        }
        _ => DocumentStoreError::rejected(status.as_u16(), message),
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for non-network Firestore helpers.

    use super::*;
    use rstest::rstest;

    fn store(config: FirestoreConfig) -> FirestoreDocumentStore {
        FirestoreDocumentStore::with_token_source(config, Arc::new(StaticToken::new("test-token")))
            .expect("client builds")
    }

    fn emulator_config() -> FirestoreConfig {
        let mut config = FirestoreConfig::new("demo-project");
        config.emulator_host = Some("127.0.0.1:8085".to_owned());
        config
    }

    #[rstest]
    #[tokio::test]
    async fn emulator_without_token_sends_no_credentials() {
        let store = FirestoreDocumentStore::connect(emulator_config())
            .await
            .expect("client builds");
        assert!(store.token_source.is_none());
    }

    #[rstest]
    #[tokio::test]
    async fn configured_token_is_used_as_is() {
        let mut config = emulator_config();
        config.access_token = Some("explicit".to_owned());
        let store = FirestoreDocumentStore::connect(config)
            .await
            .expect("client builds");
        let source = store.token_source.expect("token source configured");
        assert_eq!(source.access_token().await, Ok("explicit".to_owned()));
    }

    #[rstest]
    fn production_urls_target_the_firestore_api() {
        let config = FirestoreConfig::new("demo-project");
        let store = store(config);
        assert_eq!(
            store.document_url("Users", "a1").as_str(),
            "https://firestore.googleapis.com/v1/projects/demo-project/databases/(default)/documents/Users/a1"
        );
    }

    #[rstest]
    fn emulator_urls_use_plain_http() {
        let mut config = FirestoreConfig::new("demo-project");
        config.emulator_host = Some("127.0.0.1:8085".to_owned());
        config.database_id = "users-db".to_owned();
        let store = store(config);
        assert_eq!(
            store.collection_url("Users").as_str(),
            "http://127.0.0.1:8085/v1/projects/demo-project/databases/users-db/documents/Users"
        );
    }

    #[rstest]
    fn document_keys_are_percent_encoded() {
        let store = store(FirestoreConfig::new("demo-project"));
        let url = store.document_url("Users", "ada lovelace?");
        assert!(
            url.as_str().ends_with("/documents/Users/ada%20lovelace%3F"),
            "key should be a single encoded segment: {url}"
        );
    }

    #[rstest]
    #[tokio::test]
    async fn malformed_emulator_host_is_a_setup_error() {
        let mut config = FirestoreConfig::new("demo-project");
        config.emulator_host = Some("bad host:port".to_owned());
        assert!(matches!(
            FirestoreDocumentStore::connect(config).await,
            Err(FirestoreSetupError::Endpoint { .. })
        ));
    }

    #[rstest]
    #[case::rate_limited(StatusCode::TOO_MANY_REQUESTS, true)]
    #[case::unavailable(StatusCode::SERVICE_UNAVAILABLE, true)]
    #[case::gateway_timeout(StatusCode::GATEWAY_TIMEOUT, true)]
    #[case::forbidden(StatusCode::FORBIDDEN, false)]
    #[case::server_error(StatusCode::INTERNAL_SERVER_ERROR, false)]
    fn maps_statuses_to_store_errors(#[case] status: StatusCode, #[case] unavailable: bool) {
        let error = map_status_error(
            status,
            br#"{"error":{"code":0,"message":"backend said no","status":"SOME_STATUS"}}"#,
        );
        if unavailable {
            assert!(
                matches!(error, DocumentStoreError::Unavailable { .. }),
                "{status} should map to Unavailable, got {error:?}"
            );
        } else {
            assert_eq!(
                error,
                DocumentStoreError::rejected(status.as_u16(), "SOME_STATUS: backend said no")
            );
        }
    }

    #[rstest]
    fn non_json_error_bodies_are_previewed() {
        let body = format!("<html>{}</html>", "x".repeat(400));
        let error = map_status_error(StatusCode::BAD_REQUEST, body.as_bytes());
        let DocumentStoreError::Rejected { status, message } = error else {
            panic!("expected Rejected");
        };
        assert_eq!(status, 400);
        assert!(message.ends_with("..."));
        assert!(message.chars().count() <= 163);
    }
}
