// File: gateway/src/config/manager.rs
use super::{placeholders, Config, EndpointConfig};
use crate::constants::HEALTH_PATH;
use anyhow::{anyhow, bail, Result};
use axum::{http::Method, routing::MethodFilter};
use glob::glob;
use reqwest::Url;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use std::sync::Arc;
use tokio::fs;
use tracing::{debug, info};

pub struct ConfigManager {
    current_config: Arc<Config>,
}

impl ConfigManager {
    pub async fn new(config_dir: String) -> Result<Self> {
        let config = Self::load_configuration(&config_dir).await?;
        Ok(Self {
            current_config: Arc::new(config),
        })
    }

    pub fn get_current_config(&self) -> Arc<Config> {
        self.current_config.clone()
    }

    async fn load_configuration(config_dir: &str) -> Result<Config> {
        let main_config_path = format!("{}/main.toml", config_dir);
        let main_config_content = fs::read_to_string(&main_config_path).await
            .map_err(|e| anyhow!("Failed to read main config {}: {}", main_config_path, e))?;

        let mut config: Config = toml::from_str(&main_config_content)
            .map_err(|e| anyhow!("Failed to parse main config: {}", e))?;

        if config.backend_timeout_seconds == 0 {
            bail!("Invalid main config: backend_timeout_seconds must be greater than zero");
        }

        let pattern = format!("{}/endpoints/*.toml", config_dir);
        let mut paths = Vec::new();
        for entry in glob(&pattern).map_err(|e| anyhow!("Glob pattern error: {}", e))? {
            paths.push(entry.map_err(|e| anyhow!("Glob entry error: {}", e))?);
        }
        paths.sort();

        let mut routes = HashSet::new();
        // The router keeps one parameter naming per path shape
        let mut shapes: HashMap<String, String> = HashMap::new();
        let mut endpoints = Vec::with_capacity(paths.len());

        for path in paths {
            debug!("Loading endpoint config: {}", path.display());

            let content = fs::read_to_string(&path).await
                .map_err(|e| anyhow!("Failed to read {}: {}", path.display(), e))?;

            let mut endpoint: EndpointConfig = toml::from_str(&content)
                .map_err(|e| anyhow!("Failed to parse {}: {}", path.display(), e))?;

            endpoint.name = endpoint_name(&path)?;
            endpoint.method = endpoint.method.to_uppercase();
            validate_endpoint(&endpoint)
                .map_err(|e| anyhow!("Invalid endpoint {}: {}", path.display(), e))?;

            if !routes.insert((endpoint.method.clone(), endpoint.endpoint.clone())) {
                bail!(
                    "Duplicate route {} {} in {}",
                    endpoint.method,
                    endpoint.endpoint,
                    path.display()
                );
            }

            let shape = route_shape(&endpoint.endpoint);
            if let Some(existing) = shapes.get(&shape) {
                if existing != &endpoint.endpoint {
                    bail!(
                        "Endpoint {} in {} conflicts with {}",
                        endpoint.endpoint,
                        path.display(),
                        existing
                    );
                }
            }
            shapes.insert(shape, endpoint.endpoint.clone());

            endpoints.push(endpoint);
        }

        config.endpoints = endpoints;

        info!("Loaded {} endpoints from {}", config.endpoints.len(), config_dir);

        Ok(config)
    }
}

fn endpoint_name(path: &Path) -> Result<String> {
    path.file_stem()
        .and_then(|name| name.to_str())
        .map(str::to_owned)
        .ok_or_else(|| anyhow!("Invalid filename: {}", path.display()))
}

/// Path with parameter names erased, `/u/{id}` and `/u/{uid}` share one
fn route_shape(path: &str) -> String {
    path.split('/')
        .map(|segment| match segment_param(segment) {
            Some(name) if name.starts_with('*') => "{*}",
            Some(_) => "{}",
            None => segment,
        })
        .collect::<Vec<_>>()
        .join("/")
}

fn segment_param(segment: &str) -> Option<&str> {
    segment.strip_prefix('{')?.strip_suffix('}')
}

/// Reject paths the router cannot register
fn validate_route_path(path: &str) -> Result<()> {
    if !path.starts_with('/') {
        bail!("endpoint '{}' must start with '/'", path);
    }
    if path == HEALTH_PATH {
        bail!("endpoint '{}' is reserved for the health check", path);
    }

    let segments: Vec<&str> = path[1..].split('/').collect();
    let last = segments.len() - 1;
    let mut names = HashSet::new();

    for (i, segment) in segments.iter().enumerate() {
        if segment.starts_with(':') {
            bail!("endpoint '{}': write '{}' as '{{{}}}'", path, segment, &segment[1..]);
        }

        let Some(param) = segment_param(segment) else {
            if segment.contains(['{', '}']) {
                bail!("endpoint '{}': parameters must span a whole segment", path);
            }
            continue;
        };

        let name = match param.strip_prefix('*') {
            Some(name) if i != last => bail!("endpoint '{}': catch-all '{{*{}}}' must be last", path, name),
            Some(name) => name,
            None => param,
        };
        if name.is_empty() || name.contains(['{', '}', '*']) {
            bail!("endpoint '{}': invalid parameter name '{}'", path, param);
        }
        if !names.insert(name) {
            bail!("endpoint '{}': parameter '{}' appears twice", path, name);
        }
    }

    Ok(())
}

fn validate_endpoint(endpoint: &EndpointConfig) -> Result<()> {
    validate_route_path(&endpoint.endpoint)?;

    Method::from_bytes(endpoint.method.as_bytes())
        .ok()
        .and_then(|m| MethodFilter::try_from(m).ok())
        .ok_or_else(|| anyhow!("unsupported method '{}'", endpoint.method))?;

    let host = Url::parse(&endpoint.backend.host)
        .map_err(|e| anyhow!("backend host '{}': {}", endpoint.backend.host, e))?;
    if !matches!(host.scheme(), "http" | "https") {
        bail!("backend host '{}' must be an http(s) URL", endpoint.backend.host);
    }

    if !endpoint.backend.url_pattern.starts_with('/') {
        bail!("url_pattern '{}' must start with '/'", endpoint.backend.url_pattern);
    }
    let params = placeholders(&endpoint.endpoint);
    for name in placeholders(&endpoint.backend.url_pattern) {
        if !params.contains(&name) {
            bail!(
                "url_pattern '{}' uses '{}' which endpoint '{}' does not capture",
                endpoint.backend.url_pattern,
                name,
                endpoint.endpoint
            );
        }
    }

    // Plugin settings fail here rather than on the first request
    sso::SsoConfig::from_extra_config(&endpoint.extra_config)
        .map_err(|e| anyhow!("endpoint extra_config: {}", e))?;
    sso::SsoConfig::from_extra_config(&endpoint.backend.extra_config)
        .map_err(|e| anyhow!("backend extra_config: {}", e))?;

    Ok(())
}
