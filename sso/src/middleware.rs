//! Endpoint hook
//!
//! Authenticates inbound requests before the endpoint handler runs.

use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts, Request, State},
    http::{request::Parts, StatusCode},
    middleware::Next,
    response::Response,
};
use std::convert::Infallible;
use std::sync::Arc;

use crate::authenticator::Authenticator;
use crate::response::error_response;
use crate::types::Identity;

/// Axum middleware running the SSO check for an endpoint.
///
/// # Example
/// ```ignore
/// let app = Router::new()
///     .route("/users", get(list_users))
///     .layer(axum::middleware::from_fn_with_state(authenticator, sso_middleware));
/// ```
pub async fn sso_middleware(
    State(auth): State<Arc<Authenticator>>,
    mut req: Request,
    next: Next,
) -> Response {
    match auth.authenticate(req.headers_mut()).await {
        Ok(outcome) => {
            if let Some(identity) = outcome.identity() {
                req.extensions_mut().insert(identity.clone());
            }
            next.run(req).await
        }
        Err(e) => error_response(&e, auth.config().reject_status),
    }
}

/// Extractor for the identity resolved by [`sso_middleware`].
/// Rejects with 401 when the request went through anonymously.
pub struct SsoIdentity(pub Identity);

impl<S> FromRequestParts<S> for SsoIdentity
where
    S: Send + Sync,
{
    type Rejection = StatusCode;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Identity>()
            .cloned()
            .map(SsoIdentity)
            .ok_or(StatusCode::UNAUTHORIZED)
    }
}

impl<S> OptionalFromRequestParts<S> for SsoIdentity
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        Ok(parts.extensions.get::<Identity>().cloned().map(SsoIdentity))
    }
}
