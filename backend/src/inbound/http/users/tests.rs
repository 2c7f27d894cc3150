//! Tests for user resource handlers.

use std::sync::Arc;

use super::*;
use crate::domain::ports::{MockUserCommand, MockUserQuery};
use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::{Value, json};

fn user(id: &str, count: i8) -> User {
    User::new(UserId::new(id).expect("fixture id is valid"), count)
}

fn unused_query() -> MockUserQuery {
    let mut query = MockUserQuery::new();
    query.expect_fetch().never();
    query
}

fn unused_command() -> MockUserCommand {
    let mut command = MockUserCommand::new();
    command.expect_create().never();
    command
}

fn test_app(
    command: MockUserCommand,
    query: MockUserQuery,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let state = HttpState::new(Arc::new(command), Arc::new(query));
    App::new()
        .app_data(web::Data::new(state))
        .configure(configure_user_routes)
}

async fn json_body(response: actix_web::dev::ServiceResponse) -> Value {
    let body = actix_test::read_body(response).await;
    serde_json::from_slice(&body).expect("JSON body")
}

#[rstest]
#[actix_web::test]
async fn create_returns_stored_user() {
    let mut command = MockUserCommand::new();
    command
        .expect_create()
        .withf(|request| request.uuid.as_deref() == Some("a1") && request.count == 3)
        .times(1)
        .return_once(|_| Ok(user("a1", 3)));
    let app = actix_test::init_service(test_app(command, unused_query())).await;

    let request = actix_test::TestRequest::post()
        .uri("/")
        .set_json(json!({ "uuid": "a1", "count": 3 }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(actix_web::http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok()),
        Some("application/json")
    );
    assert_eq!(json_body(response).await, json!({ "uuid": "a1", "count": 3 }));
}

#[rstest]
#[case::empty_object("{}")]
#[case::unknown_fields(r#"{"name":"ada"}"#)]
#[actix_web::test]
async fn create_passes_defaults_for_missing_fields(#[case] body: &'static str) {
    let mut command = MockUserCommand::new();
    command
        .expect_create()
        .withf(|request| *request == NewUser::default())
        .times(1)
        .return_once(|_| Ok(user("generated", 0)));
    let app = actix_test::init_service(test_app(command, unused_query())).await;

    let request = actix_test::TestRequest::post()
        .uri("/")
        .insert_header(("content-type", "application/json"))
        .set_payload(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[rstest]
#[case::empty("")]
#[case::not_json("uuid=a1")]
#[case::count_out_of_range(r#"{"count":300}"#)]
#[case::uuid_not_string(r#"{"uuid":7}"#)]
#[actix_web::test]
async fn create_rejects_undecodable_body_as_server_error(#[case] body: &'static str) {
    let app = actix_test::init_service(test_app(unused_command(), unused_query())).await;

    let request = actix_test::TestRequest::post()
        .uri("/")
        .set_payload(body)
        .to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let value = json_body(response).await;
    assert_eq!(value["code"], "internal_error");
    assert_eq!(value["message"], "Internal server error");
}

#[rstest]
#[case::conflict(Error::forbidden("user a1 already exists"), StatusCode::FORBIDDEN)]
#[case::store_down(Error::service_unavailable("user store unavailable"), StatusCode::SERVICE_UNAVAILABLE)]
#[case::persist(Error::internal("failed to persist user"), StatusCode::INTERNAL_SERVER_ERROR)]
#[actix_web::test]
async fn create_maps_service_errors(#[case] error: Error, #[case] status: StatusCode) {
    let mut command = MockUserCommand::new();
    command.expect_create().return_once(move |_| Err(error));
    let app = actix_test::init_service(test_app(command, unused_query())).await;

    let request = actix_test::TestRequest::post()
        .uri("/")
        .set_json(json!({ "uuid": "a1" }))
        .to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), status);
}

#[rstest]
#[actix_web::test]
async fn get_returns_user() {
    let mut query = MockUserQuery::new();
    query
        .expect_fetch()
        .withf(|id| id.as_ref() == "a1")
        .times(1)
        .return_once(|id| Ok(User::new(id.clone(), -2)));
    let app = actix_test::init_service(test_app(unused_command(), query)).await;

    let request = actix_test::TestRequest::get().uri("/a1").to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({ "uuid": "a1", "count": -2 }));
}

#[rstest]
#[actix_web::test]
async fn get_reports_missing_user() {
    let mut query = MockUserQuery::new();
    query
        .expect_fetch()
        .return_once(|_| Err(Error::not_found("user not found")));
    let app = actix_test::init_service(test_app(unused_command(), query)).await;

    let request = actix_test::TestRequest::get().uri("/missing").to_request();
    let response = actix_test::call_service(&app, request).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(json_body(response).await["message"], "user not found");
}

#[rstest]
#[case::list(actix_test::TestRequest::get().uri("/"))]
#[case::update(actix_test::TestRequest::post().uri("/a1").set_json(json!({ "count": 1 })))]
#[actix_web::test]
async fn unimplemented_routes_answer_501(#[case] request: actix_test::TestRequest) {
    let app = actix_test::init_service(test_app(unused_command(), unused_query())).await;

    let response = actix_test::call_service(&app, request.to_request()).await;

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    assert_eq!(json_body(response).await["code"], "not_implemented");
}

#[rstest]
#[actix_web::test]
async fn unrouted_method_on_known_path_is_405() {
    let app = actix_test::init_service(test_app(unused_command(), unused_query())).await;

    let request = actix_test::TestRequest::delete().uri("/a1").to_request();
    let response = actix_test::call_service(&app, request).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[rstest]
fn route_table_names_are_unique() {
    let mut names: Vec<_> = USER_ROUTES.iter().map(|route| route.name).collect();
    names.sort_unstable();
    names.dedup();
    assert_eq!(names.len(), USER_ROUTES.len());
}
