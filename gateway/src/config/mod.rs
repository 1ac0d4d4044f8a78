// File: gateway/src/config/mod.rs
pub mod manager;
use anyhow::{bail, Result};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use serde::{Deserialize, Serialize};
use sso::ExtraConfig;
use std::collections::HashMap;
pub use manager::ConfigManager;

use crate::constants::defaults;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_backend_timeout")]
    pub backend_timeout_seconds: u64,
    // Populated from endpoints/*.toml
    #[serde(skip)]
    pub endpoints: Vec<EndpointConfig>,
}

fn default_host() -> String {
    defaults::HOST.to_string()
}

fn default_port() -> u16 {
    defaults::PORT
}

fn default_backend_timeout() -> u64 {
    defaults::BACKEND_TIMEOUT_SECONDS
}

/// One endpoint file: a public route and the backend it proxies to
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EndpointConfig {
    // Taken from the file name
    #[serde(skip)]
    pub name: String,
    pub endpoint: String,
    #[serde(default = "default_method")]
    pub method: String,
    #[serde(default)]
    pub extra_config: ExtraConfig,
    pub backend: BackendConfig,
}

fn default_method() -> String {
    "GET".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendConfig {
    pub host: String,
    pub url_pattern: String,
    #[serde(default)]
    pub extra_config: ExtraConfig,
}

impl BackendConfig {
    /// Backend URL with `{param}` placeholders filled from the matched path.
    ///
    /// Values are percent-encoded as a single path segment; a `{*param}`
    /// placeholder keeps the `/` separators of a catch-all value.
    pub fn target_url(&self, params: &HashMap<String, String>, query: Option<&str>) -> Result<String> {
        let mut path = String::with_capacity(self.url_pattern.len());
        let mut rest = self.url_pattern.as_str();

        while let Some((before, name, after)) = next_placeholder(rest) {
            path.push_str(before);
            let (catch_all, key) = match name.strip_prefix('*') {
                Some(key) => (true, key),
                None => (false, name),
            };
            match params.get(key) {
                Some(value) if catch_all => {
                    let segments = value
                        .split('/')
                        .map(|segment| encode_segment(key, segment))
                        .collect::<Result<Vec<_>>>()?;
                    path.push_str(&segments.join("/"));
                }
                Some(value) => path.push_str(&encode_segment(key, value)?),
                None => bail!("no value for path parameter '{}'", key),
            }
            rest = after;
        }
        path.push_str(rest);

        let mut url = format!("{}{}", self.host.trim_end_matches('/'), path);
        if let Some(query) = query.filter(|q| !q.is_empty()) {
            url.push('?');
            url.push_str(query);
        }
        Ok(url)
    }
}

/// Characters escaped inside one path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

fn encode_segment(name: &str, value: &str) -> Result<String> {
    if value == "." || value == ".." {
        bail!("path parameter '{}' cannot be '{}'", name, value);
    }
    Ok(utf8_percent_encode(value, PATH_SEGMENT).to_string())
}

/// Split `pattern` around its first `{name}` placeholder
fn next_placeholder(pattern: &str) -> Option<(&str, &str, &str)> {
    let start = pattern.find('{')?;
    let len = pattern[start..].find('}')?;
    Some((
        &pattern[..start],
        &pattern[start + 1..start + len],
        &pattern[start + len + 1..],
    ))
}

/// Names of the `{name}` / `{*name}` placeholders in a path pattern
pub fn placeholders(pattern: &str) -> Vec<&str> {
    let mut names = Vec::new();
    let mut rest = pattern;
    while let Some((_, name, after)) = next_placeholder(rest) {
        names.push(name.trim_start_matches('*'));
        rest = after;
    }
    names
}
