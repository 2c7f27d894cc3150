//! Server construction and middleware wiring.

mod settings;

pub use settings::{ServerSettings, StoreConfig};

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use actix_web::dev::{Server, ServerHandle, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::{info, warn};

use users_backend::Trace;
#[cfg(debug_assertions)]
use users_backend::doc::ApiDoc;
#[cfg(debug_assertions)]
use users_backend::domain::DOCS_SEGMENT;
use users_backend::domain::UserService;
use users_backend::inbound::http::health::{HealthState, live, ready};
use users_backend::inbound::http::state::HttpState;
use users_backend::inbound::http::users::configure_user_routes;
use users_backend::inbound::http::yourself::configure_yourself;
use users_backend::outbound::document_store::{
    DocumentStore, FirestoreDocumentStore, FirestoreSetupError, InMemoryDocumentStore,
};
use users_backend::outbound::ids::RandomUserIdGenerator;
use users_backend::outbound::persistence::DocumentUserRepository;
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Everything [`create_server`] needs beyond the health state.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) store: Arc<dyn DocumentStore>,
}

impl ServerConfig {
    /// Bundle the listener address with the shared store client.
    #[must_use]
    pub fn new(bind_addr: SocketAddr, store: Arc<dyn DocumentStore>) -> Self {
        Self { bind_addr, store }
    }
}

/// Build the shared document store client for `config`.
///
/// # Errors
/// Returns [`FirestoreSetupError`] when the Firestore client cannot be built
/// or no Google credentials are available.
pub async fn build_store(config: StoreConfig) -> Result<Arc<dyn DocumentStore>, FirestoreSetupError> {
    match config {
        StoreConfig::Memory => {
            info!(store = "memory", "using in-memory document store");
            Ok(Arc::new(InMemoryDocumentStore::new()))
        }
        StoreConfig::Firestore(firestore) => {
            info!(
                store = "firestore",
                project_id = %firestore.project_id,
                database_id = %firestore.database_id,
                emulator = firestore.emulator_host.as_deref(),
                "connecting to Firestore"
            );
            Ok(Arc::new(FirestoreDocumentStore::connect(firestore).await?))
        }
    }
}

fn build_http_state(store: Arc<dyn DocumentStore>) -> HttpState {
    let repository = Arc::new(DocumentUserRepository::new(store));
    let service = Arc::new(UserService::new(
        repository,
        Arc::new(RandomUserIdGenerator::new()),
    ));
    HttpState::new(service.clone(), service)
}

fn build_app(
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live)
        .configure(configure_yourself);

    #[cfg(debug_assertions)]
    let app = app.service(
        SwaggerUi::new(format!("/{DOCS_SEGMENT}")).url("/api-docs/openapi.json", ApiDoc::openapi()),
    );

    // `/{uuid}` matches any single segment, so it is registered last.
    app.configure(configure_user_routes)
}

/// Seconds in-flight requests get to finish once draining starts.
const DRAIN_TIMEOUT_SECS: u64 = 30;

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// Actix's own signal handling is disabled; pair the server with
/// [`drain_on`] so health checks fail before connections close.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let ServerConfig { bind_addr, store } = config;
    let http_state = web::Data::new(build_http_state(store));

    let server = HttpServer::new(move || {
        build_app(server_health_state.clone(), http_state.clone())
    })
    .disable_signals()
    .shutdown_timeout(DRAIN_TIMEOUT_SECS)
    .bind(bind_addr)?
    .run();

    info!(%bind_addr, "listening");
    health_state.mark_ready();
    Ok(server)
}

/// Wait for `signal`, then fail both health checks and stop the server gracefully.
pub async fn drain_on(
    signal: impl Future<Output = ()>,
    health_state: web::Data<HealthState>,
    handle: ServerHandle,
) {
    signal.await;
    info!("shutdown requested; draining");
    health_state.begin_drain();
    handle.stop(true).await;
}

/// Resolve on SIGINT or, on Unix, SIGTERM.
///
/// A signal whose handler cannot be installed is logged and never fires.
pub async fn termination_signal() {
    let interrupt = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            warn!(error = %err, "SIGINT handler unavailable");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                warn!(error = %err, "SIGTERM handler unavailable");
                std::future::pending::<()>().await;
            }
        }
    };
    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => {}
        () = terminate => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::http::StatusCode;
    use actix_web::test;
    use rstest::rstest;
    use serde_json::{Value, json};

    async fn app() -> impl actix_web::dev::Service<
        actix_http::Request,
        Response = ServiceResponse,
        Error = actix_web::Error,
    > {
        let health = web::Data::new(HealthState::new());
        health.mark_ready();
        let state = web::Data::new(build_http_state(Arc::new(InMemoryDocumentStore::new())));
        test::init_service(build_app(health, state)).await
    }

    #[rstest]
    #[case("/yourself")]
    #[case("/health/ready")]
    #[case("/health/live")]
    #[actix_web::test]
    async fn fixed_paths_are_not_shadowed_by_user_lookup(#[case] path: &str) {
        let app = app().await;
        let response = test::call_service(&app, test::TestRequest::get().uri(path).to_request()).await;
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[rstest]
    #[actix_web::test]
    async fn created_user_can_be_fetched() {
        let app = app().await;
        let created: Value = test::call_and_read_body_json(
            &app,
            test::TestRequest::post()
                .uri("/")
                .set_json(json!({ "uuid": "a1", "count": 2 }))
                .to_request(),
        )
        .await;
        assert_eq!(created, json!({ "uuid": "a1", "count": 2 }));

        let fetched: Value =
            test::call_and_read_body_json(&app, test::TestRequest::get().uri("/a1").to_request())
                .await;
        assert_eq!(fetched, created);
    }

    #[rstest]
    #[actix_web::test]
    async fn every_response_carries_trace_header() {
        let app = app().await;
        let response =
            test::call_service(&app, test::TestRequest::get().uri("/missing").to_request()).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key("trace-id"));
    }

    #[rstest]
    #[actix_web::test]
    async fn drain_fails_health_checks_and_stops_the_server() {
        let health = web::Data::new(HealthState::new());
        let config = ServerConfig::new(
            SocketAddr::from(([127, 0, 0, 1], 0)),
            Arc::new(InMemoryDocumentStore::new()),
        );
        let server = create_server(health.clone(), config).expect("bind ephemeral port");
        let handle = server.handle();
        let running = actix_web::rt::spawn(server);
        assert!(health.is_ready());

        drain_on(std::future::ready(()), health.clone(), handle).await;

        assert!(!health.is_alive());
        assert!(!health.is_ready());
        running
            .await
            .expect("server task joins")
            .expect("server stops cleanly");
    }
}
