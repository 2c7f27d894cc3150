//! Backend entry-point: loads settings, builds the shared store client and
//! serves the user API.

mod server;

use std::ffi::OsString;

use actix_web::web;
use color_eyre::eyre::{Result, eyre};
use mockable::DefaultEnv;
use ortho_config::OrthoConfig;
use tracing::{error, warn};
use tracing_subscriber::{EnvFilter, fmt};

use server::{ServerConfig, ServerSettings, build_store, create_server, drain_on, termination_signal};
use users_backend::inbound::http::health::HealthState;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os().collect::<Vec<OsString>>())
        .map_err(|err| eyre!("failed to load settings: {err}"))?;
    let bind_addr = settings.bind_addr()?;

    // Store bootstrap failure is fatal.
    let store_config = settings
        .store_config(&DefaultEnv::new())
        .map_err(|err| eyre!(err))
        .inspect_err(|err| error!(error = %err, "document store bootstrap failed"))?;
    let store = build_store(store_config)
        .await
        .map_err(|err| eyre!(err))
        .inspect_err(|err| error!(error = %err, "document store bootstrap failed"))?;

    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state.clone(), ServerConfig::new(bind_addr, store))?;
    actix_web::rt::spawn(drain_on(termination_signal(), health_state, server.handle()));
    server.await?;
    Ok(())
}
