//! Users backend library modules.
//!
//! Hexagonal layout: [`domain`] holds entities, errors, ports and the user
//! service; [`inbound`] adapts HTTP requests onto the driving ports;
//! [`outbound`] implements the driven ports over a document store.

pub mod doc;
pub mod domain;
pub mod inbound;
pub mod middleware;
pub mod outbound;

/// Public OpenAPI surface used by Swagger UI and tooling.
pub use doc::ApiDoc;
pub use domain::TraceId;
pub use middleware::Trace;
