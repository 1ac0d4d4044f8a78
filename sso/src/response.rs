use axum::{
    body::Body,
    http::{header, HeaderValue, Response, StatusCode},
};

use crate::errors::AuthError;

/// Response sent instead of forwarding a request that failed authentication
pub fn error_response(err: &AuthError, status: StatusCode) -> Response<Body> {
    // ErrorBody holds only strings and integers
    let body = serde_json::to_vec(&err.to_body()).unwrap_or_default();

    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response.headers_mut().insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static("application/json"),
    );
    response
}
