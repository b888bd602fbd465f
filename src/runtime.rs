//! # Runtime Support
//!
//! The small library generated handlers call into. It fixes the wire
//! contract every endpoint shares:
//!
//! - request bodies are JSON objects decoded into the parameter record
//! - failures are `{"HTTPStatus": <int>, "Err": "<message>"}` with the same
//!   status on the response line
//! - successes are the JSON-encoded business result with
//!   `Content-Type: application/json` and `200 OK`
//!
//! Requests and responses are plain [`http`] types with buffered bodies, so
//! any server that can collect a body can host a generated [`ApiService`].
//!
//! ```rust,ignore
//! let service = MyApi::new();
//! let req = http::Request::post("/user/create")
//!     .header("Authorization", "100500")
//!     .body(br#"{"login": "someone_long"}"#.to_vec())?;
//! let res = service.serve_http(&req);
//! ```

use std::fmt;
use std::sync::Arc;

use http::header::{HeaderValue, CONTENT_TYPE};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

pub use http::StatusCode;

/// Request as seen by generated handlers.
pub type Request = http::Request<Vec<u8>>;

/// Response produced by generated handlers.
pub type Response = http::Response<Vec<u8>>;

/// `Content-Type` of every response body.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Error envelope returned for every failed request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Same code as the response status line
    #[serde(rename = "HTTPStatus")]
    pub http_status: u16,
    /// Client-facing message
    #[serde(rename = "Err")]
    pub err: String,
}

impl ApiError {
    /// Build an envelope for `status`.
    pub fn new(status: StatusCode, err: impl Into<String>) -> Self {
        Self {
            http_status: status.as_u16(),
            err: err.into(),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.http_status, self.err)
    }
}

impl std::error::Error for ApiError {}

/// Request-scoped values handed to business methods.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Context {
    method: String,
    path: String,
}

impl Context {
    /// Capture the request line of `req`.
    pub fn from_request(req: &Request) -> Self {
        Self {
            method: req.method().as_str().to_string(),
            path: req.uri().path().to_string(),
        }
    }

    /// Request verb.
    pub fn method(&self) -> &str {
        &self.method
    }

    /// Request path, without the query string.
    pub fn path(&self) -> &str {
        &self.path
    }
}

/// A type that answers HTTP requests. Generated routers implement this for
/// every owner type with at least one annotated method.
pub trait ApiService {
    /// Dispatch `req` to the handler registered for its exact verb and path.
    fn serve_http(&self, req: &Request) -> Response;
}

impl<T: ApiService + ?Sized> ApiService for Arc<T> {
    fn serve_http(&self, req: &Request) -> Response {
        (**self).serve_http(req)
    }
}

impl<T: ApiService + ?Sized> ApiService for &T {
    fn serve_http(&self, req: &Request) -> Response {
        (**self).serve_http(req)
    }
}

/// Whether header `name` is present with exactly `expected` as its value.
pub fn header_equals(req: &Request, name: &str, expected: &str) -> bool {
    req.headers()
        .get(name)
        .is_some_and(|value| value.as_bytes() == expected.as_bytes())
}

/// Decode the request body as JSON.
pub fn decode_body<T: DeserializeOwned>(req: &Request) -> Result<T, serde_json::Error> {
    serde_json::from_slice(req.body())
}

fn with_body(status: StatusCode, body: Vec<u8>) -> Response {
    let mut res = Response::new(body);
    *res.status_mut() = status;
    res.headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
    res
}

/// Build the error envelope response for `status`.
pub fn error_response(status: StatusCode, message: &str) -> Response {
    let envelope = ApiError::new(status, message);
    match serde_json::to_vec(&envelope) {
        Ok(body) => with_body(status, body),
        // A struct of a u16 and a String always serializes.
        Err(_) => with_body(status, Vec::new()),
    }
}

/// Build a `200 OK` response carrying `value` as JSON.
///
/// A value that fails to serialize yields a 500 envelope instead.
pub fn json_response<T: Serialize + ?Sized>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => with_body(StatusCode::OK, body),
        Err(e) => error_response(StatusCode::INTERNAL_SERVER_ERROR, &e.to_string()),
    }
}
