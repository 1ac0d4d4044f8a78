//! Error types for the SSO plugin
//!
//! Authentication failures turn into client-facing error bodies; configuration
//! errors are reported when the gateway builds its routes.

use axum::http::StatusCode;
use thiserror::Error;

use crate::types::ErrorBody;

/// Why a request could not be authenticated
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum AuthError {
    /// Ticket header absent, empty or not valid UTF-8
    #[error("missing authentication header {0}")]
    MissingTicket(String),

    /// SSO service rejected the ticket
    #[error("invalid ticket: {0}")]
    InvalidTicket(String),

    /// Ticket resolved but no user is attached to it
    #[error("user does not exist: {0}")]
    UnknownUser(String),

    /// Transport failure or timeout talking to the SSO service
    #[error("SSO service unreachable: {0}")]
    Unreachable(String),

    /// SSO service answered with a non-success status
    #[error("SSO service returned status {0}")]
    UpstreamStatus(u16),

    /// Body could not be decoded or identity fields are unusable as headers
    #[error("invalid SSO response: {0}")]
    InvalidResponse(String),
}

impl AuthError {
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody::auth_failed(&self.to_string())
    }
}

/// Invalid plugin configuration
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("extra config under '{namespace}' must be an object")]
    NotAnObject { namespace: String },

    #[error("failed to parse plugin config: {reason}")]
    ParseError { reason: String },

    #[error("missing required field: {field}")]
    MissingRequired { field: String },

    #[error("invalid value for '{field}': {reason}")]
    InvalidValue { field: String, reason: String },

    #[error("failed to create SSO client: {reason}")]
    ClientBuild { reason: String },
}

/// Failures of a request executor on the backend hook
#[derive(Debug, Error)]
pub enum ExecutorError {
    #[error("backend request failed: {0}")]
    Backend(String),

    #[error("failed to build response: {0}")]
    Response(#[from] axum::http::Error),
}

impl ExecutorError {
    /// Status the host should answer with when the executor fails
    pub fn status_code(&self) -> StatusCode {
        match self {
            ExecutorError::Backend(_) => StatusCode::BAD_GATEWAY,
            ExecutorError::Response(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
