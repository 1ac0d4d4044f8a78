//! Mock SSO service for testing
//!
//! Answers the ticket lookup endpoint without a real SSO deployment.

#![allow(dead_code)]

use serde_json::{json, Value};
use sso::{ExtraConfig, SsoConfig, NAMESPACE};
use wiremock::{
    matchers::{header, method, path},
    Mock, MockServer, ResponseTemplate,
};

pub const TICKET_PATH: &str = "/api/ticket/userinfo";

pub struct MockSsoServer {
    pub server: MockServer,
    pub base_url: String,
}

impl MockSsoServer {
    pub async fn start() -> Self {
        let server = MockServer::start().await;
        let base_url = server.uri();
        Self { server, base_url }
    }

    pub fn validation_url(&self) -> String {
        format!("{}{}", self.base_url, TICKET_PATH)
    }

    /// Extra config enabling the plugin against this server
    pub fn extra_config(&self, settings: Value) -> ExtraConfig {
        let mut plugin = json!({ "validation_url": self.validation_url() });
        if let (Some(target), Value::Object(extra)) = (plugin.as_object_mut(), settings) {
            target.extend(extra);
        }
        let mut map = ExtraConfig::new();
        map.insert(NAMESPACE.to_string(), plugin);
        map
    }

    pub fn config(&self, settings: Value) -> SsoConfig {
        SsoConfig::from_extra_config(&self.extra_config(settings))
            .expect("valid config")
            .expect("plugin enabled")
    }

    /// Mock a ticket that resolves to a user
    pub async fn mock_user(&self, ticket: &str, email: &str, account: &str, name: &str) {
        Mock::given(method("GET"))
            .and(path(TICKET_PATH))
            .and(header("ticket", ticket))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": 0,
                "message": "success",
                "data": {
                    "LoginEmail": email,
                    "AccountGuid": account,
                    "DisplayName": name
                }
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a ticket the SSO service refuses
    pub async fn mock_invalid_ticket(&self, ticket: &str, message: &str) {
        Mock::given(method("GET"))
            .and(path(TICKET_PATH))
            .and(header("ticket", ticket))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": 4012,
                "message": message,
                "data": null
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock a ticket with no user behind it
    pub async fn mock_no_user(&self, ticket: &str, message: &str) {
        Mock::given(method("GET"))
            .and(path(TICKET_PATH))
            .and(header("ticket", ticket))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "errorCode": 0,
                "message": message,
                "data": null
            })))
            .mount(&self.server)
            .await;
    }

    /// Mock an arbitrary raw response
    pub async fn mock_raw(&self, status: u16, body: &str) {
        Mock::given(method("GET"))
            .and(path(TICKET_PATH))
            .respond_with(ResponseTemplate::new(status).set_body_string(body))
            .mount(&self.server)
            .await;
    }

    /// Mock a response slower than any sane timeout
    pub async fn mock_slow(&self, delay: std::time::Duration) {
        Mock::given(method("GET"))
            .and(path(TICKET_PATH))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_delay(delay)
                    .set_body_json(json!({"errorCode": 0, "data": null})),
            )
            .mount(&self.server)
            .await;
    }
}
