//! Backend hook
//!
//! The gateway sends every backend request through a [`RequestExecutor`].
//! [`backend_executor`] is the factory the gateway calls once per backend: it
//! wraps the executor with the SSO check when the backend's extra config
//! enables the plugin and hands it back untouched otherwise.

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, Response},
};
use std::sync::Arc;
use tracing::info;

use crate::authenticator::Authenticator;
use crate::config::{ExtraConfig, SsoConfig};
use crate::errors::{ConfigError, ExecutorError};
use crate::response::error_response;

/// Performs one backend round trip
#[async_trait]
pub trait RequestExecutor: Send + Sync {
    async fn execute(&self, req: Request<Body>) -> Result<Response<Body>, ExecutorError>;
}

/// Executor that authenticates the request before delegating
pub struct SsoExecutor {
    auth: Arc<Authenticator>,
    inner: Arc<dyn RequestExecutor>,
}

impl SsoExecutor {
    pub fn new(auth: Arc<Authenticator>, inner: Arc<dyn RequestExecutor>) -> Self {
        Self { auth, inner }
    }
}

#[async_trait]
impl RequestExecutor for SsoExecutor {
    async fn execute(&self, mut req: Request<Body>) -> Result<Response<Body>, ExecutorError> {
        if let Err(e) = self.auth.authenticate(req.headers_mut()).await {
            return Ok(error_response(&e, self.auth.config().reject_status));
        }
        self.inner.execute(req).await
    }
}

/// Build the executor for one backend.
pub fn backend_executor(
    backend: &str,
    extra: &ExtraConfig,
    inner: Arc<dyn RequestExecutor>,
) -> Result<Arc<dyn RequestExecutor>, ConfigError> {
    match SsoConfig::from_extra_config(extra)? {
        Some(config) => {
            info!(
                "SSO plugin enabled for backend {} (validation url {})",
                backend, config.validation_url
            );
            let auth = Arc::new(Authenticator::from_config(config)?);
            Ok(Arc::new(SsoExecutor::new(auth, inner)))
        }
        None => {
            info!("SSO plugin not configured for backend {}", backend);
            Ok(inner)
        }
    }
}
