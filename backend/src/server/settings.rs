//! Server settings loaded via OrthoConfig.
//!
//! Values come from CLI flags, `USERS_*` environment variables and an
//! optional configuration file. The Firestore project and emulator host also
//! honour the conventional Google Cloud variables when the `USERS_*` forms
//! are unset.

use std::net::{IpAddr, SocketAddr};
use std::time::Duration;

use mockable::Env;
use ortho_config::OrthoConfig;
use serde::Deserialize;
use users_backend::outbound::document_store::FirestoreConfig;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 8080;
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 10;
const PROJECT_ID_FALLBACK_ENV: &str = "GOOGLE_CLOUD_PROJECT";
const EMULATOR_HOST_FALLBACK_ENV: &str = "FIRESTORE_EMULATOR_HOST";

/// Configuration values controlling the listener and the user store.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "USERS")]
pub struct ServerSettings {
    /// Address to bind the HTTP listener to.
    pub host: Option<String>,
    /// Port to bind the HTTP listener to.
    pub port: Option<u16>,
    /// Document store backend: `firestore` or `memory`.
    pub store: Option<String>,
    /// Google Cloud project owning the Firestore database.
    pub project_id: Option<String>,
    /// Firestore database identifier.
    pub database_id: Option<String>,
    /// `host:port` of a Firestore emulator.
    pub emulator_host: Option<String>,
    /// OAuth2 bearer token for Firestore requests.
    pub access_token: Option<String>,
    /// Per-request timeout for store calls, in seconds.
    pub request_timeout_secs: Option<u64>,
}

/// Document store selected at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreConfig {
    /// Process-local maps; data is lost on restart.
    Memory,
    /// Cloud Firestore or its emulator.
    Firestore(FirestoreConfig),
}

/// Errors raised while resolving server settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// The listener address is not an IP address.
    #[error("invalid value for host='{value}'; expected an IP address")]
    InvalidHost { value: String },
    /// The store selector names no known backend.
    #[error("invalid value for store='{value}'; expected firestore|memory")]
    UnknownStore { value: String },
    /// Firestore was selected without a project identifier.
    #[error("missing Firestore project id; set USERS_PROJECT_ID or {PROJECT_ID_FALLBACK_ENV}")]
    MissingProjectId,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

impl ServerSettings {
    /// Socket address the listener binds to.
    pub fn bind_addr(&self) -> Result<SocketAddr, SettingsError> {
        let host = self.host.as_deref().unwrap_or(DEFAULT_HOST);
        let ip: IpAddr = host.parse().map_err(|_| SettingsError::InvalidHost {
            value: host.to_owned(),
        })?;
        Ok(SocketAddr::new(ip, self.port.unwrap_or(DEFAULT_PORT)))
    }

    fn request_timeout(&self) -> Duration {
        Duration::from_secs(
            self.request_timeout_secs
                .unwrap_or(DEFAULT_REQUEST_TIMEOUT_SECS),
        )
    }

    /// Resolve the document store configuration.
    ///
    /// `env` supplies the Google Cloud fallback variables.
    pub fn store_config<E: Env>(&self, env: &E) -> Result<StoreConfig, SettingsError> {
        let selector = self.store.as_deref().unwrap_or("firestore");
        match selector.trim().to_ascii_lowercase().as_str() {
            "memory" => Ok(StoreConfig::Memory),
            "firestore" => self.firestore_config(env).map(StoreConfig::Firestore),
            _ => Err(SettingsError::UnknownStore {
                value: selector.to_owned(),
            }),
        }
    }

    fn firestore_config<E: Env>(&self, env: &E) -> Result<FirestoreConfig, SettingsError> {
        let project_id = non_empty(self.project_id.clone())
            .or_else(|| non_empty(env.string(PROJECT_ID_FALLBACK_ENV)))
            .ok_or(SettingsError::MissingProjectId)?;

        let mut config = FirestoreConfig::new(project_id);
        if let Some(database_id) = non_empty(self.database_id.clone()) {
            config.database_id = database_id;
        }
        config.emulator_host = non_empty(self.emulator_host.clone())
            .or_else(|| non_empty(env.string(EMULATOR_HOST_FALLBACK_ENV)));
        config.access_token = non_empty(self.access_token.clone());
        config.timeout = self.request_timeout();
        Ok(config)
    }
}
