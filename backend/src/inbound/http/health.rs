//! Health endpoints: liveness and readiness checks for orchestration.
//!
//! The process moves through three phases: starting (live, not ready),
//! serving (live and ready) and draining (neither). Draining is one-way so
//! a late `mark_ready` cannot reopen a server that is shutting down.

use std::sync::atomic::{AtomicU8, Ordering};

use actix_web::{HttpResponse, get, http::header, web};
use tracing::debug;

const STARTING: u8 = 0;
const SERVING: u8 = 1;
const DRAINING: u8 = 2;

/// Shared lifecycle phase backing the readiness and liveness checks.
pub struct HealthState {
    phase: AtomicU8,
}

impl Default for HealthState {
    fn default() -> Self {
        Self {
            phase: AtomicU8::new(STARTING),
        }
    }
}

impl HealthState {
    /// Create a new health state in the starting phase.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter the serving phase once the listener is bound.
    ///
    /// Has no effect after [`HealthState::begin_drain`].
    pub fn mark_ready(&self) {
        if self
            .phase
            .compare_exchange(STARTING, SERVING, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            debug!("readiness ignored; server is not starting");
        }
    }

    /// Enter the draining phase so both checks fail during shutdown.
    pub fn begin_drain(&self) {
        self.phase.store(DRAINING, Ordering::Release);
    }

    /// Whether the server should receive traffic.
    pub fn is_ready(&self) -> bool {
        self.phase.load(Ordering::Acquire) == SERVING
    }

    /// Whether the process is still running normally.
    pub fn is_alive(&self) -> bool {
        self.phase.load(Ordering::Acquire) != DRAINING
    }
}

fn status_response(healthy: bool) -> HttpResponse {
    let mut response = if healthy {
        HttpResponse::Ok()
    } else {
        HttpResponse::ServiceUnavailable()
    };
    response
        .insert_header((header::CACHE_CONTROL, "no-store"))
        .finish()
}

/// Readiness check. Return 200 while serving; 503 while starting or draining.
#[utoipa::path(
    get,
    path = "/health/ready",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is ready to handle traffic"),
        (status = 503, description = "Server is not ready")
    )
)]
#[get("/health/ready")]
pub async fn ready(state: web::Data<HealthState>) -> HttpResponse {
    status_response(state.is_ready())
}

/// Liveness check. Return 200 until the server starts draining.
#[utoipa::path(
    get,
    path = "/health/live",
    tags = ["health"],
    responses(
        (status = 200, description = "Server is alive"),
        (status = 503, description = "Server is shutting down")
    )
)]
#[get("/health/live")]
pub async fn live(state: web::Data<HealthState>) -> HttpResponse {
    status_response(state.is_alive())
}
