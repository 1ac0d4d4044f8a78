//! Wire types exchanged with the SSO service and returned to clients.

use serde::{Deserialize, Serialize};

/// Error code the SSO service uses for an unknown or expired ticket.
pub const INVALID_TICKET_CODE: i64 = 4012;

/// Error id carried by every rejection body.
pub const AUTH_FAILED_ERROR_ID: i64 = 4001;

/// Response of the SSO ticket lookup endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TicketUserInfoResponse {
    #[serde(rename = "errorCode", default)]
    pub error_code: i64,
    #[serde(default)]
    pub data: Option<SsoData>,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SsoData {
    #[serde(rename = "LoginEmail", default)]
    pub login_email: String,
    #[serde(rename = "AccountGuid", default)]
    pub account_guid: String,
    #[serde(rename = "DisplayName", default)]
    pub display_name: String,
}

/// Identity resolved from a ticket. Lives for a single request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub login_email: String,
    pub account_guid: String,
    pub display_name: String,
}

impl From<SsoData> for Identity {
    fn from(data: SsoData) -> Self {
        Self {
            login_email: data.login_email,
            account_guid: data.account_guid,
            display_name: data.display_name,
        }
    }
}

/// JSON body of a short-circuited request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error_id: i64,
    pub reason: String,
    pub desc: String,
}

impl ErrorBody {
    pub fn auth_failed(detail: &str) -> Self {
        let text = format!("Authentication failed: {}", detail);
        Self {
            error_id: AUTH_FAILED_ERROR_ID,
            reason: text.clone(),
            desc: text,
        }
    }
}
