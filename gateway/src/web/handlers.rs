// File: gateway/src/web/handlers.rs
use axum::{
    extract::{Path, Request, State},
    http::{StatusCode, Uri},
    response::{IntoResponse, Json, Response},
};
use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tracing::{error, info_span, warn, Instrument};
use uuid::Uuid;

use crate::web::EndpointState;

// === PROXY ===

/// Forward the request to the endpoint's backend
pub async fn proxy(
    State(state): State<EndpointState>,
    params: Option<Path<HashMap<String, String>>>,
    req: Request,
) -> Response {
    let request_id = Uuid::new_v4();
    let span = info_span!("proxy", endpoint = %state.name, %request_id);

    async move {
        let params = params.map(|Path(p)| p).unwrap_or_default();
        let target = match state.backend.target_url(&params, req.uri().query()) {
            Ok(target) => target,
            Err(e) => {
                warn!("Refusing to build backend url: {}", e);
                return error_json(StatusCode::BAD_REQUEST, e.to_string());
            }
        };

        let uri: Uri = match target.parse() {
            Ok(uri) => uri,
            Err(e) => {
                error!("Invalid backend url {}: {}", target, e);
                return error_json(StatusCode::BAD_GATEWAY, format!("invalid backend url: {}", e));
            }
        };

        let (mut parts, body) = req.into_parts();
        parts.uri = uri;

        match state.executor.execute(Request::from_parts(parts, body)).await {
            Ok(response) => response,
            Err(e) => {
                error!("Backend call failed: {}", e);
                error_json(e.status_code(), e.to_string())
            }
        }
    }
    .instrument(span)
    .await
}

fn error_json(status: StatusCode, message: String) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

// === HEALTH ===

pub async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": Utc::now(),
    }))
}
