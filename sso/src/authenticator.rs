//! The validate-then-forward pipeline shared by both gateway hooks.

use axum::http::{HeaderMap, HeaderValue};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::client::{SsoClient, TicketResolver};
use crate::config::SsoConfig;
use crate::errors::{AuthError, ConfigError};
use crate::types::Identity;

/// Result of a successful authentication
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Ticket resolved, identity headers injected
    Authenticated(Identity),
    /// No ticket presented and anonymous mode allows it
    Anonymous,
}

impl Outcome {
    pub fn identity(&self) -> Option<&Identity> {
        match self {
            Outcome::Authenticated(identity) => Some(identity),
            Outcome::Anonymous => None,
        }
    }
}

pub struct Authenticator {
    config: Arc<SsoConfig>,
    resolver: Arc<dyn TicketResolver>,
}

impl Authenticator {
    pub fn new(config: Arc<SsoConfig>, resolver: Arc<dyn TicketResolver>) -> Self {
        Self { config, resolver }
    }

    /// Authenticator backed by the HTTP SSO client
    pub fn from_config(config: SsoConfig) -> Result<Self, ConfigError> {
        let client = SsoClient::new(&config)?;
        Ok(Self::new(Arc::new(config), Arc::new(client)))
    }

    pub fn config(&self) -> &SsoConfig {
        &self.config
    }

    /// Authenticate the request carrying `headers`, injecting identity headers on success.
    pub async fn authenticate(&self, headers: &mut HeaderMap) -> Result<Outcome, AuthError> {
        // Identity headers are only ever set by us
        for name in self.config.identity_headers() {
            if headers.remove(name).is_some() {
                warn!("Dropped client-supplied identity header {}", name);
            }
        }

        let ticket = headers
            .get(&self.config.ticket_header)
            .and_then(|v| v.to_str().ok())
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .map(str::to_owned);

        let Some(ticket) = ticket else {
            if self.config.anonymous {
                debug!("No ticket presented, forwarding anonymously");
                return Ok(Outcome::Anonymous);
            }
            let err = AuthError::MissingTicket(self.config.ticket_header.to_string());
            warn!("Rejecting request: {}", err);
            return Err(err);
        };

        let identity = match self.resolver.resolve(&ticket).await {
            Ok(identity) => identity,
            Err(e) => {
                warn!("Rejecting request: {}", e);
                return Err(e);
            }
        };

        self.inject(headers, &identity)?;
        debug!(
            "Authenticated {} (account {})",
            identity.login_email, identity.account_guid
        );

        Ok(Outcome::Authenticated(identity))
    }

    fn inject(&self, headers: &mut HeaderMap, identity: &Identity) -> Result<(), AuthError> {
        headers.insert(
            self.config.email_header.clone(),
            header_value("LoginEmail", &identity.login_email)?,
        );
        headers.insert(
            self.config.account_header.clone(),
            header_value("AccountGuid", &identity.account_guid)?,
        );
        if let Some(name) = &self.config.display_name_header {
            headers.insert(
                name.clone(),
                header_value("DisplayName", &identity.display_name)?,
            );
        }
        Ok(())
    }
}

fn header_value(field: &str, value: &str) -> Result<HeaderValue, AuthError> {
    HeaderValue::from_str(value)
        .map_err(|_| AuthError::InvalidResponse(format!("{} is not a valid header value", field)))
}
