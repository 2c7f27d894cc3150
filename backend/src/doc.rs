//! OpenAPI documentation configuration.
//!
//! [`ApiDoc`] registers every HTTP endpoint from the inbound layer (users,
//! introspection, health) and the schema wrappers ([`ErrorSchema`],
//! [`ErrorCodeSchema`], [`UserSchema`], [`NewUserSchema`]) that describe
//! domain types without coupling them to utoipa.
//!
//! The generated document is served by Swagger UI in debug builds and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::schemas::{ErrorCodeSchema, ErrorSchema, NewUserSchema, UserSchema};
use crate::inbound::http::yourself::RequestInfo;
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Users backend API",
        description = "Create and fetch users stored in a document database."
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::users::create_user,
        crate::inbound::http::users::get_user,
        crate::inbound::http::users::list_users,
        crate::inbound::http::users::update_user,
        crate::inbound::http::yourself::yourself,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        UserSchema,
        NewUserSchema,
        ErrorSchema,
        ErrorCodeSchema,
        RequestInfo
    )),
    tags(
        (name = "users", description = "User resource"),
        (name = "introspection", description = "Request echo"),
        (name = "health", description = "Endpoints for health checks")
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    //! Tests verifying the registered OpenAPI surface.

    use super::*;
    use utoipa::OpenApi;
    use utoipa::openapi::RefOr;
    use utoipa::openapi::schema::Schema;

    // utoipa replaces :: with . in schema names
    const USER_SCHEMA_NAME: &str = "crate.domain.User";

    #[test]
    fn openapi_user_schema_has_wire_fields() {
        let doc = ApiDoc::openapi();
        let schemas = &doc.components.as_ref().expect("components").schemas;
        let user_schema = schemas.get(USER_SCHEMA_NAME).expect("User schema");

        match user_schema {
            RefOr::T(Schema::Object(obj)) => {
                assert!(obj.properties.contains_key("uuid"));
                assert!(obj.properties.contains_key("count"));
            }
            _ => panic!("expected Object schema"),
        }
    }

    #[test]
    fn openapi_registers_every_path() {
        let doc = ApiDoc::openapi();
        for path in ["/", "/{uuid}", "/yourself", "/health/ready", "/health/live"] {
            assert!(doc.paths.paths.contains_key(path), "missing path {path}");
        }
        let root = doc.paths.paths.get("/").expect("root path");
        assert!(root.get.is_some() && root.post.is_some());
    }
}
