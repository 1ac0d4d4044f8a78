//! Reusable test utilities:
//! - Test configuration builder writing a config directory to a temp dir
//! - Mock SSO service and mock backend

// Allow unused code in test fixtures - not every test uses every helper
#![allow(dead_code)]

use serde_json::json;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;
use wiremock::{
    matchers::{any, header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const SSO_NAMESPACE: &str = "github.com/gs012345/sso";
pub const TICKET_PATH: &str = "/ticket/userinfo";

/// Builder for creating test configurations
pub struct TestConfigBuilder {
    temp_dir: TempDir,
    main_toml: String,
    endpoints: Vec<(String, String)>,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        Self {
            temp_dir,
            main_toml: "host = \"127.0.0.1\"\nport = 0\nbackend_timeout_seconds = 5\n".to_string(),
            endpoints: Vec::new(),
        }
    }

    pub fn with_main_toml(mut self, toml: &str) -> Self {
        self.main_toml = toml.to_string();
        self
    }

    /// Add an endpoint file written verbatim
    pub fn with_endpoint_toml(mut self, name: &str, toml: &str) -> Self {
        self.endpoints.push((name.to_string(), toml.to_string()));
        self
    }

    /// Add an endpoint file built from its parts
    pub fn with_endpoint<F>(self, name: &str, f: F) -> Self
    where
        F: FnOnce(EndpointBuilder) -> EndpointBuilder,
    {
        let toml = f(EndpointBuilder::default()).to_toml();
        self.with_endpoint_toml(name, &toml)
    }

    pub fn build(self) -> TestConfig {
        let config_dir = self.temp_dir.path().join("config");
        let endpoints_dir = config_dir.join("endpoints");
        fs::create_dir_all(&endpoints_dir).expect("Failed to create config dir");

        fs::write(config_dir.join("main.toml"), &self.main_toml).expect("Failed to write main.toml");

        for (name, toml) in &self.endpoints {
            fs::write(endpoints_dir.join(format!("{}.toml", name)), toml)
                .expect("Failed to write endpoint config");
        }

        TestConfig {
            _temp_dir: self.temp_dir,
            config_dir,
        }
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

pub struct TestConfig {
    _temp_dir: TempDir,
    pub config_dir: PathBuf,
}

impl TestConfig {
    pub fn dir(&self) -> String {
        self.config_dir.to_string_lossy().to_string()
    }
}

/// Endpoint file builder
#[derive(Clone)]
pub struct EndpointBuilder {
    endpoint: String,
    method: String,
    backend_host: String,
    url_pattern: String,
    endpoint_sso: Option<String>,
    backend_sso: Option<String>,
}

impl EndpointBuilder {
    pub fn endpoint(mut self, endpoint: &str) -> Self {
        self.endpoint = endpoint.to_string();
        self
    }

    pub fn method(mut self, method: &str) -> Self {
        self.method = method.to_string();
        self
    }

    pub fn backend(mut self, host: &str, url_pattern: &str) -> Self {
        self.backend_host = host.to_string();
        self.url_pattern = url_pattern.to_string();
        self
    }

    /// Enable the plugin on the endpoint; `settings` are extra TOML lines
    pub fn endpoint_sso(mut self, validation_url: &str, settings: &str) -> Self {
        self.endpoint_sso = Some(format!("validation_url = \"{}\"\n{}", validation_url, settings));
        self
    }

    /// Enable the plugin on the backend; `settings` are extra TOML lines
    pub fn backend_sso(mut self, validation_url: &str, settings: &str) -> Self {
        self.backend_sso = Some(format!("validation_url = \"{}\"\n{}", validation_url, settings));
        self
    }

    fn to_toml(&self) -> String {
        let mut toml = format!(
            "endpoint = \"{}\"\nmethod = \"{}\"\n",
            self.endpoint, self.method
        );
        if let Some(sso) = &self.endpoint_sso {
            toml.push_str(&format!("\n[extra_config.\"{}\"]\n{}\n", SSO_NAMESPACE, sso));
        }
        toml.push_str(&format!(
            "\n[backend]\nhost = \"{}\"\nurl_pattern = \"{}\"\n",
            self.backend_host, self.url_pattern
        ));
        if let Some(sso) = &self.backend_sso {
            toml.push_str(&format!("\n[backend.extra_config.\"{}\"]\n{}\n", SSO_NAMESPACE, sso));
        }
        toml
    }
}

impl Default for EndpointBuilder {
    fn default() -> Self {
        Self {
            endpoint: "/users".to_string(),
            method: "GET".to_string(),
            backend_host: "http://127.0.0.1:9".to_string(),
            url_pattern: "/users".to_string(),
            endpoint_sso: None,
            backend_sso: None,
        }
    }
}

/// Mock SSO service
pub struct MockSso {
    pub server: MockServer,
}

impl MockSso {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn validation_url(&self) -> String {
        format!("{}{}", self.server.uri(), TICKET_PATH)
    }

    pub async fn mock_user(&self, ticket: &str, email: &str, account: &str) {
        Mock::given(method("GET"))
            .and(path(TICKET_PATH))
            .and(header("ticket", ticket))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": 0,
                "message": "success",
                "data": {"LoginEmail": email, "AccountGuid": account, "DisplayName": "Test User"}
            })))
            .mount(&self.server)
            .await;
    }

    pub async fn mock_invalid_ticket(&self, ticket: &str) {
        Mock::given(method("GET"))
            .and(path(TICKET_PATH))
            .and(header("ticket", ticket))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": 4012,
                "message": "ticket expired",
                "data": null
            })))
            .mount(&self.server)
            .await;
    }
}

/// Mock backend service
pub struct MockBackend {
    pub server: MockServer,
}

impl MockBackend {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    pub fn uri(&self) -> String {
        self.server.uri()
    }

    /// Answer `GET backend_path` only when the identity headers match
    pub async fn mock_identity(&self, backend_path: &str, email: &str, account: &str) {
        Mock::given(method("GET"))
            .and(path(backend_path))
            .and(header("UserEmail", email))
            .and(header("AccountGuid", account))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "user": email
            })))
            .mount(&self.server)
            .await;
    }

    /// Answer any method on `backend_path`
    pub async fn mock_any(&self, backend_path: &str, status: u16, body: serde_json::Value) {
        Mock::given(path(backend_path))
            .respond_with(ResponseTemplate::new(status).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    /// Answer every request with an empty JSON object
    pub async fn mock_catch_all(&self) {
        Mock::given(any())
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
            .mount(&self.server)
            .await;
    }

    /// Raw path and query of every request the backend received
    pub async fn received_targets(&self) -> Vec<(String, Option<String>)> {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .map(|r| (r.url.path().to_string(), r.url.query().map(str::to_owned)))
            .collect()
    }

    pub async fn request_count(&self) -> usize {
        self.server
            .received_requests()
            .await
            .map(|r| r.len())
            .unwrap_or(0)
    }
}
