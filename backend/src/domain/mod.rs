//! Domain primitives, ports and services for the user resource.
//!
//! Purpose: hold the resource lifecycle logic (identifier allocation,
//! existence-checked creation and lookup) independently of HTTP and of the
//! document store driver.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic error payload.
//! - User / UserId / NewUser: the user entity and its create request.
//! - UserService: implements the [`ports::UserCommand`] and
//!   [`ports::UserQuery`] driving ports.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
pub mod ports;
pub mod trace_id;
pub mod user;
pub mod user_service;

pub use self::error::{Error, ErrorCode};
pub use self::trace_id::TraceId;
pub use self::user::{
    DOCS_SEGMENT, NewUser, RESERVED_USER_IDS, User, UserId, UserValidationError,
    YOURSELF_SEGMENT,
};
pub use self::user_service::UserService;

/// HTTP header name used to propagate trace identifiers.
pub const TRACE_ID_HEADER: &str = "trace-id";
