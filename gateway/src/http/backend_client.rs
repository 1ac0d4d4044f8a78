// File: gateway/src/http/backend_client.rs
use anyhow::Result;
use async_trait::async_trait;
use axum::{
    body::Body,
    http::{header, HeaderMap, HeaderName, Request, Response},
};
use reqwest::Client;
use sso::{ExecutorError, RequestExecutor};
use std::time::Duration;
use tracing::debug;

use crate::constants::http::{CONNECT_TIMEOUT, MAX_BODY_BYTES};

/// Drop headers that only make sense for a single connection,
/// including any the `Connection` header lists
pub fn strip_hop_by_hop(headers: &mut HeaderMap) {
    let listed: Vec<HeaderName> = headers
        .get_all(header::CONNECTION)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(|value| value.split(','))
        .filter_map(|name| HeaderName::from_bytes(name.trim().as_bytes()).ok())
        .collect();
    for name in listed {
        headers.remove(name);
    }

    let hop_by_hop = [
        header::CONNECTION,
        header::PROXY_AUTHENTICATE,
        header::PROXY_AUTHORIZATION,
        header::TE,
        header::TRAILER,
        header::TRANSFER_ENCODING,
        header::UPGRADE,
    ];
    for name in hop_by_hop {
        headers.remove(name);
    }
    headers.remove("keep-alive");
}

/// Executes backend requests over HTTP
pub struct ReqwestExecutor {
    client: Client,
}

impl ReqwestExecutor {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(CONNECT_TIMEOUT)
            .build()?;

        Ok(Self { client })
    }
}

#[async_trait]
impl RequestExecutor for ReqwestExecutor {
    async fn execute(&self, req: Request<Body>) -> Result<Response<Body>, ExecutorError> {
        let (parts, body) = req.into_parts();
        let body = axum::body::to_bytes(body, MAX_BODY_BYTES)
            .await
            .map_err(|e| ExecutorError::Backend(format!("failed to read request body: {}", e)))?;

        let mut headers = parts.headers;
        strip_hop_by_hop(&mut headers);
        headers.remove(header::HOST);

        let url = parts.uri.to_string();
        debug!("Forwarding {} {}", parts.method, url);

        let response = self
            .client
            .request(parts.method, &url)
            .headers(headers)
            .body(body)
            .send()
            .await
            .map_err(|e| ExecutorError::Backend(format!("{}: {}", url, e)))?;

        let status = response.status();
        let mut headers = response.headers().clone();
        strip_hop_by_hop(&mut headers);

        let bytes = response
            .bytes()
            .await
            .map_err(|e| ExecutorError::Backend(format!("failed to read response from {}: {}", url, e)))?;

        let mut out = Response::builder().status(status).body(Body::from(bytes))?;
        *out.headers_mut() = headers;
        Ok(out)
    }
}
