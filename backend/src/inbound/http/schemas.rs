//! OpenAPI schema definitions for domain types.
//!
//! Domain types remain framework-agnostic by not deriving `ToSchema`. The
//! wrappers below mirror their corresponding domain types but live in the
//! inbound adapter layer where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// A user with the requested identifier already exists.
    #[schema(rename = "forbidden")]
    Forbidden,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The route has no behaviour yet.
    #[schema(rename = "not_implemented")]
    NotImplemented,
    /// The user store could not be reached.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for error response bodies.
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// Stable machine-readable error code.
    #[schema(example = "not_found")]
    code: ErrorCodeSchema,
    /// Short human-readable message.
    #[schema(example = "user not found")]
    message: String,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
}

/// OpenAPI schema for [`crate::domain::User`].
#[derive(ToSchema)]
#[schema(as = crate::domain::User)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct UserSchema {
    /// Stable user identifier.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    uuid: String,
    /// Opaque signed 8-bit counter.
    #[schema(example = 0)]
    count: i8,
}

/// OpenAPI schema for [`crate::domain::NewUser`].
#[derive(ToSchema)]
#[schema(as = crate::domain::NewUser)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct NewUserSchema {
    /// Requested identifier; allocated by the server when absent or empty.
    #[schema(example = "a1")]
    uuid: Option<String>,
    /// Initial counter value, zero when absent.
    #[schema(example = 0)]
    count: Option<i8>,
}
