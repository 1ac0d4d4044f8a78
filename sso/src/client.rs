//! Ticket lookup against the SSO service
//!
//! One `GET` per request, the ticket travels in the `ticket` header. There is
//! no caching and no retry: a failed lookup fails the request.

use async_trait::async_trait;
use reqwest::{Client, Url};
use tracing::debug;

use crate::config::SsoConfig;
use crate::errors::{AuthError, ConfigError};
use crate::types::{Identity, TicketUserInfoResponse, INVALID_TICKET_CODE};

/// Header the SSO service reads the ticket from
pub const TICKET_REQUEST_HEADER: &str = "ticket";

/// Resolves a ticket into the identity it belongs to
#[async_trait]
pub trait TicketResolver: Send + Sync {
    async fn resolve(&self, ticket: &str) -> Result<Identity, AuthError>;
}

/// HTTP client for the SSO ticket endpoint
pub struct SsoClient {
    client: Client,
    validation_url: Url,
}

impl SsoClient {
    pub fn new(config: &SsoConfig) -> Result<Self, ConfigError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::ClientBuild {
                reason: e.to_string(),
            })?;

        Ok(Self {
            client,
            validation_url: config.validation_url.clone(),
        })
    }

    pub fn validation_url(&self) -> &Url {
        &self.validation_url
    }
}

#[async_trait]
impl TicketResolver for SsoClient {
    async fn resolve(&self, ticket: &str) -> Result<Identity, AuthError> {
        let response = self
            .client
            .get(self.validation_url.clone())
            .header(TICKET_REQUEST_HEADER, ticket)
            .send()
            .await
            .map_err(|e| AuthError::Unreachable(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AuthError::UpstreamStatus(status.as_u16()));
        }

        let body: TicketUserInfoResponse = response
            .json()
            .await
            .map_err(|e| AuthError::InvalidResponse(e.to_string()))?;

        debug!(
            "SSO lookup answered with errorCode {} ({})",
            body.error_code, body.message
        );

        interpret(body)
    }
}

/// Map an SSO answer onto an identity or a rejection
fn interpret(body: TicketUserInfoResponse) -> Result<Identity, AuthError> {
    if body.error_code == INVALID_TICKET_CODE {
        return Err(AuthError::InvalidTicket(body.message));
    }

    match body.data {
        Some(data) => Ok(Identity::from(data)),
        None => Err(AuthError::UnknownUser(body.message)),
    }
}
