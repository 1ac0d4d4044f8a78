// File: gateway/src/web/server.rs
use crate::config::Config;
use crate::constants::HEALTH_PATH;
use crate::http::ReqwestExecutor;
use crate::web::{handlers, EndpointState};
use anyhow::{anyhow, Result};
use axum::{
    http::Method,
    middleware,
    routing::{get, on, MethodFilter, MethodRouter},
    Router,
};
use sso::{backend_executor, sso_middleware, Authenticator, RequestExecutor, SsoConfig};
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tower_http::trace::TraceLayer;
use tracing::info;

pub async fn start_web_server(config: Arc<Config>) -> Result<()> {
    let app = create_router(&config)?;
    let addr = format!("{}:{}", config.host, config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Gateway running on http://{}", addr);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received, draining connections");
}

/// Build the gateway router, attaching the SSO plugin where configured.
///
/// Endpoint-level settings wrap the handler with [`sso_middleware`];
/// backend-level settings wrap the backend executor.
pub fn create_router(config: &Config) -> Result<Router> {
    let http_executor: Arc<dyn RequestExecutor> = Arc::new(ReqwestExecutor::new(
        Duration::from_secs(config.backend_timeout_seconds),
    )?);

    // Endpoints sharing a path are merged into one method router
    let mut routes: BTreeMap<String, MethodRouter> = BTreeMap::new();

    for endpoint in &config.endpoints {
        let executor = backend_executor(
            &endpoint.name,
            &endpoint.backend.extra_config,
            http_executor.clone(),
        )?;

        let state = EndpointState {
            name: endpoint.name.as_str().into(),
            backend: Arc::new(endpoint.backend.clone()),
            executor,
        };

        let method = Method::from_bytes(endpoint.method.as_bytes())?;
        let filter = MethodFilter::try_from(method)
            .map_err(|e| anyhow!("Endpoint {}: {}", endpoint.name, e))?;

        let mut route: MethodRouter = on(filter, handlers::proxy).with_state(state);

        match SsoConfig::from_extra_config(&endpoint.extra_config)? {
            Some(sso_config) => {
                info!(
                    "SSO plugin enabled for endpoint {} {} ({})",
                    endpoint.method, endpoint.endpoint, endpoint.name
                );
                let auth = Arc::new(Authenticator::from_config(sso_config)?);
                route = route.layer(middleware::from_fn_with_state(auth, sso_middleware));
            }
            None => info!(
                "SSO plugin not configured for endpoint {} {} ({})",
                endpoint.method, endpoint.endpoint, endpoint.name
            ),
        }

        let merged = match routes.remove(&endpoint.endpoint) {
            Some(existing) => existing.merge(route),
            None => route,
        };
        routes.insert(endpoint.endpoint.clone(), merged);
    }

    let router = routes
        .into_iter()
        .fold(
            Router::new().route(HEALTH_PATH, get(handlers::health)),
            |router, (path, method_router)| router.route(&path, method_router),
        )
        .layer(TraceLayer::new_for_http());

    Ok(router)
}
