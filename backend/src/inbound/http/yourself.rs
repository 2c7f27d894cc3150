//! Request introspection endpoint.
//!
//! ```text
//! GET|POST|PUT|DELETE /yourself  {"contentType": "...", "method": "..."}
//! ```
//!
//! Echoes the request's `Content-Type` header and method so callers can see
//! how their request arrived. Any other method answers `405` with a plain
//! text body.

use actix_web::http::header::{self, ContentType};
use actix_web::{HttpRequest, HttpResponse, web};
use serde::Serialize;
use tracing::debug;

use crate::domain::YOURSELF_SEGMENT;

const METHOD_NOT_ALLOWED_BODY: &str = "405 - Method Not Allowed";

/// Introspection payload.
#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RequestInfo {
    /// `Content-Type` header as sent, or empty when absent.
    #[schema(example = "application/json")]
    pub content_type: String,
    /// Request method.
    #[schema(example = "GET")]
    pub method: String,
}

/// Describe the incoming request.
#[utoipa::path(
    get,
    path = "/yourself",
    responses(
        (status = 200, description = "Request content type and method", body = RequestInfo),
        (status = 405, description = "Method other than GET, POST, PUT or DELETE", content_type = "text/plain", body = String)
    ),
    tags = ["introspection"],
    operation_id = "yourself"
)]
pub async fn yourself(request: HttpRequest) -> web::Json<RequestInfo> {
    let content_type = request
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    let method = request.method().as_str().to_owned();
    debug!(%content_type, %method, "introspection request");
    web::Json(RequestInfo {
        content_type,
        method,
    })
}

async fn method_not_allowed(request: HttpRequest) -> HttpResponse {
    debug!(method = %request.method(), "introspection method not allowed");
    HttpResponse::MethodNotAllowed()
        .content_type(ContentType::plaintext())
        .body(METHOD_NOT_ALLOWED_BODY)
}

/// Register `/yourself` on `cfg`.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_backend::inbound::http::yourself::configure_yourself;
///
/// let app = App::new().configure(configure_yourself);
/// ```
pub fn configure_yourself(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource(format!("/{YOURSELF_SEGMENT}"))
            .route(web::get().to(yourself))
            .route(web::post().to(yourself))
            .route(web::put().to(yourself))
            .route(web::delete().to(yourself))
            .default_service(web::to(method_not_allowed)),
    );
}
