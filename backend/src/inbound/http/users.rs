//! User resource handlers and routing table.
//!
//! ```text
//! POST /          {"uuid"?: string, "count"?: int8}  create a user
//! GET  /{uuid}                                       fetch a user
//! GET  /                                             list users (501)
//! POST /{uuid}                                       update a user (501)
//! ```
//!
//! Routes are declared once in [`USER_ROUTES`] and registered by
//! [`configure_user_routes`]; each table entry names the handler it
//! dispatches to.

use actix_web::{Route, web};
use serde_json::json;
use tracing::{debug, warn};

use crate::domain::{Error, NewUser, User, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, NewUserSchema, UserSchema};
use crate::inbound::http::state::HttpState;

/// HTTP method accepted by a user route.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteMethod {
    /// `GET`
    Get,
    /// `POST`
    Post,
}

/// Handler a user route dispatches to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserHandler {
    /// [`create_user`]
    Create,
    /// [`get_user`]
    Fetch,
    /// [`list_users`]
    List,
    /// [`update_user`]
    Update,
}

/// One entry of the user routing table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserRoute {
    /// Operation name, matching the OpenAPI operation id.
    pub name: &'static str,
    /// Method the route answers.
    pub method: RouteMethod,
    /// Actix path pattern relative to the mount point.
    pub pattern: &'static str,
    /// Handler the route dispatches to.
    pub handler: UserHandler,
}

/// Every route served for the user resource.
pub const USER_ROUTES: [UserRoute; 4] = [
    UserRoute {
        name: "createUser",
        method: RouteMethod::Post,
        pattern: "/",
        handler: UserHandler::Create,
    },
    UserRoute {
        name: "listUsers",
        method: RouteMethod::Get,
        pattern: "/",
        handler: UserHandler::List,
    },
    UserRoute {
        name: "getUser",
        method: RouteMethod::Get,
        pattern: "/{uuid}",
        handler: UserHandler::Fetch,
    },
    UserRoute {
        name: "updateUser",
        method: RouteMethod::Post,
        pattern: "/{uuid}",
        handler: UserHandler::Update,
    },
];

fn actix_route(route: &UserRoute) -> Route {
    let base = match route.method {
        RouteMethod::Get => web::get(),
        RouteMethod::Post => web::post(),
    };
    match route.handler {
        UserHandler::Create => base.to(create_user),
        UserHandler::Fetch => base.to(get_user),
        UserHandler::List => base.to(list_users),
        UserHandler::Update => base.to(update_user),
    }
}

/// Register every entry of [`USER_ROUTES`] on `cfg`.
///
/// Entries sharing a pattern are grouped under one resource so that an
/// unmatched method on a known path answers `405`. Fixed paths served
/// elsewhere (for example `/yourself`) must be registered before this runs,
/// otherwise `/{uuid}` shadows them.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use users_backend::inbound::http::users::configure_user_routes;
///
/// let app = App::new().configure(configure_user_routes);
/// ```
pub fn configure_user_routes(cfg: &mut web::ServiceConfig) {
    let mut patterns: Vec<&'static str> = Vec::new();
    for route in &USER_ROUTES {
        if !patterns.contains(&route.pattern) {
            patterns.push(route.pattern);
        }
    }

    for pattern in patterns {
        let resource = USER_ROUTES
            .iter()
            .filter(|route| route.pattern == pattern)
            .fold(web::resource(pattern), |resource, route| {
                resource.route(actix_route(route))
            });
        cfg.service(resource);
    }
}

fn decode_failed(err: &serde_json::Error) -> Error {
    Error::internal(format!("failed to decode user: {err}"))
        .with_details(json!({ "code": "user_decode_failed" }))
}

/// Create a user.
///
/// Malformed or empty bodies answer `500` like every other create failure,
/// not the `400` an extractor would produce.
#[utoipa::path(
    post,
    path = "/",
    request_body = NewUserSchema,
    responses(
        (status = 200, description = "User created", body = UserSchema),
        (status = 403, description = "A user with this id already exists", body = ErrorSchema),
        (status = 500, description = "Body could not be decoded or the user could not be stored", body = ErrorSchema),
        (status = 503, description = "User store unavailable", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
pub async fn create_user(
    state: web::Data<HttpState>,
    body: web::Bytes,
) -> ApiResult<web::Json<User>> {
    let request: NewUser = serde_json::from_slice(&body).map_err(|err| {
        warn!(error = %err, "rejected create user body");
        decode_failed(&err)
    })?;
    let user = state.users_command.create(request).await?;
    Ok(web::Json(user))
}

/// Fetch a user by identifier.
#[utoipa::path(
    get,
    path = "/{uuid}",
    params(("uuid" = String, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 404, description = "User not found", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
pub async fn get_user(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<User>> {
    let raw = path.into_inner();
    let id = UserId::new(&raw).map_err(|err| {
        debug!(user_id = %raw, error = %err, "unusable user id in path");
        Error::not_found("user not found")
    })?;
    let user = state.users_query.fetch(&id).await?;
    Ok(web::Json(user))
}

/// List users. Not implemented.
#[utoipa::path(
    get,
    path = "/",
    responses((status = 501, description = "Not implemented", body = ErrorSchema)),
    tags = ["users"],
    operation_id = "listUsers"
)]
pub async fn list_users() -> ApiResult<web::Json<Vec<User>>> {
    Err(Error::not_implemented("listing users is not implemented"))
}

/// Update a user. Not implemented.
#[utoipa::path(
    post,
    path = "/{uuid}",
    params(("uuid" = String, Path, description = "User identifier")),
    responses((status = 501, description = "Not implemented", body = ErrorSchema)),
    tags = ["users"],
    operation_id = "updateUser"
)]
pub async fn update_user(path: web::Path<String>) -> ApiResult<web::Json<User>> {
    debug!(user_id = %path.as_str(), "update requested");
    Err(Error::not_implemented("updating users is not implemented"))
}

#[cfg(test)]
mod tests;
