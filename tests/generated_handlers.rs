#![allow(clippy::unwrap_used, clippy::expect_used)]

//! Exercises the checked-in generated handlers end to end. The golden test in
//! `generator_tests.rs` keeps them identical to fresh generator output.

#[allow(dead_code)]
mod api {
    include!("fixtures/api.rs");
    include!("fixtures/api_handlers.rs");
}

use apigen::runtime::{ApiError, ApiService, Request, Response, StatusCode, JSON_CONTENT_TYPE};
use api::{MyApi, OtherApi};
use serde_json::{json, Value};
use std::sync::Arc;

const AUTH: &str = "100500";

fn request(method: &str, path: &str, auth: Option<&str>, body: Value) -> Request {
    let mut builder = http::Request::builder().method(method).uri(path);
    if let Some(token) = auth {
        builder = builder.header("Authorization", token);
    }
    builder.body(serde_json::to_vec(&body).unwrap()).unwrap()
}

fn raw_request(method: &str, path: &str, body: &str) -> Request {
    http::Request::builder()
        .method(method)
        .uri(path)
        .header("Authorization", AUTH)
        .body(body.as_bytes().to_vec())
        .unwrap()
}

fn assert_error(res: &Response, status: StatusCode, message: &str) {
    assert_eq!(res.status(), status);
    assert_eq!(res.headers()["content-type"], JSON_CONTENT_TYPE);
    let envelope: ApiError = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(envelope, ApiError::new(status, message));
    let raw: Value = serde_json::from_slice(res.body()).unwrap();
    assert_eq!(raw, json!({"HTTPStatus": status.as_u16(), "Err": message}));
}

fn body(res: &Response) -> Value {
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(res.headers()["content-type"], JSON_CONTENT_TYPE);
    serde_json::from_slice(res.body()).unwrap()
}

fn create(api: &MyApi, auth: Option<&str>, params: Value) -> Response {
    api.serve_http(&request("POST", "/user/create", auth, params))
}

fn valid_create() -> Value {
    json!({"login": "new_user_login", "full_name": "New User", "status": "user", "age": 32})
}

#[test]
fn test_profile_success() {
    let api = MyApi::new();
    let res = api.serve_http(&request("GET", "/user/profile", None, json!({"login": "rvasily"})));
    assert_eq!(
        body(&res),
        json!({
            "id": 42,
            "login": "rvasily",
            "full_name": "Vasily Romanov",
            "status": 20,
            "served_from": "/user/profile"
        })
    );
}

#[test]
fn test_profile_required_login() {
    let api = MyApi::new();
    let res = api.serve_http(&request("GET", "/user/profile", None, json!({"login": ""})));
    assert_error(&res, StatusCode::BAD_REQUEST, "login must be not empty");

    // Missing fields decode to their defaults and fail the same way.
    let res = api.serve_http(&request("GET", "/user/profile", None, json!({})));
    assert_error(&res, StatusCode::BAD_REQUEST, "login must be not empty");
}

#[test]
fn test_business_error_is_internal_with_message() {
    let api = MyApi::new();
    let res = api.serve_http(&request("GET", "/user/profile", None, json!({"login": "bad_user"})));
    assert_error(&res, StatusCode::INTERNAL_SERVER_ERROR, "bad user");

    let mut params = valid_create();
    params["login"] = json!("mr.moderator");
    let res = create(&api, Some(AUTH), params);
    assert_error(&res, StatusCode::INTERNAL_SERVER_ERROR, "user mr.moderator exists");
}

#[test]
fn test_auth_runs_before_decoding() {
    let api = MyApi::new();
    for auth in [None, Some("100501"), Some("")] {
        let res = create(&api, auth, valid_create());
        assert_error(&res, StatusCode::UNAUTHORIZED, "unauthorized");
    }
    // The body is never looked at without valid credentials.
    let mut req = raw_request("POST", "/user/create", "this is not json");
    req.headers_mut().remove("Authorization");
    assert_error(&api.serve_http(&req), StatusCode::UNAUTHORIZED, "unauthorized");
}

#[test]
fn test_invalid_body() {
    let api = MyApi::new();
    for body in ["", "{", "[1, 2]", r#"{"age": "old"}"#] {
        let res = api.serve_http(&raw_request("POST", "/user/create", body));
        assert_error(&res, StatusCode::BAD_REQUEST, "invalid request body");
    }
}

#[test]
fn test_create_success() {
    let api = MyApi::new();
    let res = create(&api, Some(AUTH), valid_create());
    assert_eq!(body(&res), json!({"id": 42}));
}

#[test]
fn test_string_length_bound() {
    let api = MyApi::new();
    let mut params = valid_create();
    params["login"] = json!("short");
    let res = create(&api, Some(AUTH), params);
    assert_error(&res, StatusCode::BAD_REQUEST, "login length must be >= 10");

    // Length counts characters, not bytes.
    let mut params = valid_create();
    params["login"] = json!("ёжикёжик");
    let res = create(&api, Some(AUTH), params);
    assert_error(&res, StatusCode::BAD_REQUEST, "login length must be >= 10");
}

#[test]
fn test_integer_bounds() {
    let api = MyApi::new();
    for (age, expected) in [
        (-1, Some("age must be >= 0")),
        (200, Some("age must be <= 128")),
        (0, None),
        (50, None),
        (128, None),
    ] {
        let mut params = valid_create();
        params["age"] = json!(age);
        let res = create(&api, Some(AUTH), params);
        match expected {
            Some(message) => assert_error(&res, StatusCode::BAD_REQUEST, message),
            None => assert_eq!(body(&res), json!({"id": 42}), "age {age}"),
        }
    }
}

#[test]
fn test_enum_membership() {
    let api = MyApi::new();
    let mut params = valid_create();
    params["status"] = json!("hacker");
    let res = create(&api, Some(AUTH), params);
    assert_error(
        &res,
        StatusCode::BAD_REQUEST,
        "status must be one of [user|moderator|admin]",
    );

    let mut params = valid_create();
    params["status"] = json!("admin");
    assert_eq!(body(&create(&api, Some(AUTH), params)), json!({"id": 42}));
}

#[test]
fn test_first_failing_check_wins() {
    let api = MyApi::new();
    // Every field is invalid; only the first declared check is reported.
    let params = json!({"login": "", "status": "hacker", "age": 500});
    let res = create(&api, Some(AUTH), params);
    assert_error(&res, StatusCode::BAD_REQUEST, "login must be not empty");

    let params = json!({"login": "long_enough_login", "status": "hacker", "age": 500});
    let res = create(&api, Some(AUTH), params);
    assert_error(
        &res,
        StatusCode::BAD_REQUEST,
        "status must be one of [user|moderator|admin]",
    );
}

#[test]
fn test_unknown_routes() {
    let api = MyApi::new();
    let res = api.serve_http(&request("GET", "/user/unknown", None, json!({})));
    assert_error(&res, StatusCode::NOT_FOUND, "unknown method GET on /user/unknown");

    // Verb and path must both match exactly.
    let res = api.serve_http(&request("POST", "/user/profile", Some(AUTH), json!({})));
    assert_error(&res, StatusCode::NOT_FOUND, "unknown method POST on /user/profile");
    let res = api.serve_http(&request("GET", "/user/profile/", None, json!({"login": "a"})));
    assert_error(&res, StatusCode::NOT_FOUND, "unknown method GET on /user/profile/");
}

#[test]
fn test_routers_are_per_owner() {
    let other = OtherApi;
    let res = other.serve_http(&request("GET", "/user/profile", None, json!({"login": "a"})));
    assert_error(&res, StatusCode::NOT_FOUND, "unknown method GET on /user/profile");

    let params = json!({"username": "v", "account_name": "x", "class": "warrior", "level": 1});
    let res = other.serve_http(&request("POST", "/user/create", Some(AUTH), params));
    assert_error(&res, StatusCode::BAD_REQUEST, "username length must be >= 3");

    let params = json!({"username": "vasily", "class": "barbarian", "level": 1});
    let res = other.serve_http(&request("POST", "/user/create", Some(AUTH), params));
    assert_error(
        &res,
        StatusCode::BAD_REQUEST,
        "class must be one of [warrior|sorcerer|rouge]",
    );

    let params = json!({"username": "vasily", "class": "sorcerer", "level": 51});
    let res = other.serve_http(&request("POST", "/user/create", Some(AUTH), params));
    assert_error(&res, StatusCode::BAD_REQUEST, "level must be <= 50");

    let params = json!({"username": "vasily", "class": "sorcerer", "level": 50});
    let res = other.serve_http(&request("POST", "/user/create", Some(AUTH), params));
    assert_eq!(
        body(&res),
        json!({"id": 12, "login": "vasily", "class": "sorcerer", "level": 50})
    );
}

#[test]
fn test_services_are_shareable() {
    let services: Vec<Arc<dyn ApiService + Send + Sync>> =
        vec![Arc::new(MyApi::new()), Arc::new(OtherApi)];
    let handles: Vec<_> = services
        .into_iter()
        .map(|service| {
            std::thread::spawn(move || {
                let res = service.serve_http(&request("DELETE", "/", None, json!(null)));
                res.status()
            })
        })
        .collect();
    for handle in handles {
        assert_eq!(handle.join().unwrap(), StatusCode::NOT_FOUND);
    }
}
