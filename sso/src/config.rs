//! Plugin configuration read from a route's extra config
//!
//! The gateway hands every endpoint and backend an `extra_config` object keyed
//! by plugin namespace. The plugin is active for a route only when its
//! namespace is present.

use axum::http::{HeaderName, StatusCode};
use reqwest::Url;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::time::Duration;

use crate::errors::ConfigError;

/// Namespace the plugin settings live under
pub const NAMESPACE: &str = "github.com/gs012345/sso";

/// Per-route plugin settings, keyed by namespace
pub type ExtraConfig = Map<String, Value>;

pub mod defaults {
    pub const TICKET_HEADER: &str = "X-Sso-Fullticketid";
    pub const EMAIL_HEADER: &str = "UserEmail";
    pub const ACCOUNT_HEADER: &str = "AccountGuid";
    pub const TIMEOUT_SECONDS: u64 = 10;
    /// Rejections are reported in the body, the status stays 200
    pub const REJECT_STATUS: u16 = 200;
}

/// Settings as written in the route file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RawSsoConfig {
    #[serde(default = "default_ticket_header")]
    pub ticket_header: String,
    #[serde(default = "default_email_header")]
    pub email_header: String,
    #[serde(default = "default_account_header")]
    pub account_header: String,
    pub display_name_header: Option<String>,
    pub validation_url: Option<String>,
    #[serde(default)]
    pub anonymous: bool,
    #[serde(default = "default_timeout_seconds")]
    pub timeout_seconds: u64,
    #[serde(default = "default_reject_status")]
    pub reject_status: u16,
}

fn default_ticket_header() -> String {
    defaults::TICKET_HEADER.to_string()
}

fn default_email_header() -> String {
    defaults::EMAIL_HEADER.to_string()
}

fn default_account_header() -> String {
    defaults::ACCOUNT_HEADER.to_string()
}

fn default_timeout_seconds() -> u64 {
    defaults::TIMEOUT_SECONDS
}

fn default_reject_status() -> u16 {
    defaults::REJECT_STATUS
}

/// Validated plugin configuration
#[derive(Debug, Clone)]
pub struct SsoConfig {
    pub ticket_header: HeaderName,
    pub email_header: HeaderName,
    pub account_header: HeaderName,
    pub display_name_header: Option<HeaderName>,
    pub validation_url: Url,
    pub anonymous: bool,
    pub timeout: Duration,
    pub reject_status: StatusCode,
}

/// Whether the plugin namespace is present in a route's extra config
pub fn is_enabled(extra: &ExtraConfig) -> bool {
    extra.contains_key(NAMESPACE)
}

impl SsoConfig {
    /// Read the plugin settings from a route's extra config.
    ///
    /// Returns `Ok(None)` when the namespace is absent.
    pub fn from_extra_config(extra: &ExtraConfig) -> Result<Option<Self>, ConfigError> {
        let Some(value) = extra.get(NAMESPACE) else {
            return Ok(None);
        };

        if !value.is_object() {
            return Err(ConfigError::NotAnObject {
                namespace: NAMESPACE.to_string(),
            });
        }

        let raw: RawSsoConfig =
            serde_json::from_value(value.clone()).map_err(|e| ConfigError::ParseError {
                reason: e.to_string(),
            })?;

        Self::try_from(raw).map(Some)
    }

    /// Identity headers the plugin owns on forwarded requests
    pub fn identity_headers(&self) -> impl Iterator<Item = &HeaderName> {
        [&self.email_header, &self.account_header]
            .into_iter()
            .chain(self.display_name_header.as_ref())
    }
}

impl TryFrom<RawSsoConfig> for SsoConfig {
    type Error = ConfigError;

    fn try_from(raw: RawSsoConfig) -> Result<Self, Self::Error> {
        let url = raw
            .validation_url
            .filter(|u| !u.trim().is_empty())
            .ok_or_else(|| ConfigError::MissingRequired {
                field: "validation_url".to_string(),
            })?;

        let validation_url = Url::parse(&url).map_err(|e| ConfigError::InvalidValue {
            field: "validation_url".to_string(),
            reason: e.to_string(),
        })?;
        if !matches!(validation_url.scheme(), "http" | "https") {
            return Err(ConfigError::InvalidValue {
                field: "validation_url".to_string(),
                reason: format!("unsupported scheme '{}'", validation_url.scheme()),
            });
        }

        if raw.timeout_seconds == 0 {
            return Err(ConfigError::InvalidValue {
                field: "timeout_seconds".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }

        let reject_status =
            StatusCode::from_u16(raw.reject_status).map_err(|e| ConfigError::InvalidValue {
                field: "reject_status".to_string(),
                reason: e.to_string(),
            })?;

        let config = Self {
            ticket_header: parse_header("ticket_header", &raw.ticket_header)?,
            email_header: parse_header("email_header", &raw.email_header)?,
            account_header: parse_header("account_header", &raw.account_header)?,
            display_name_header: raw
                .display_name_header
                .as_deref()
                .map(|h| parse_header("display_name_header", h))
                .transpose()?,
            validation_url,
            anonymous: raw.anonymous,
            timeout: Duration::from_secs(raw.timeout_seconds),
            reject_status,
        };

        // Identity headers are stripped before the ticket is read
        if config.identity_headers().any(|h| *h == config.ticket_header) {
            return Err(ConfigError::InvalidValue {
                field: "ticket_header".to_string(),
                reason: format!("'{}' is also an identity header", config.ticket_header),
            });
        }

        Ok(config)
    }
}

fn parse_header(field: &str, name: &str) -> Result<HeaderName, ConfigError> {
    HeaderName::try_from(name).map_err(|e| ConfigError::InvalidValue {
        field: field.to_string(),
        reason: e.to_string(),
    })
}
