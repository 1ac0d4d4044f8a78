//! SSO ticket authentication plugin
//!
//! Reads a session ticket header, resolves it through the SSO service and
//! either forwards the request with identity headers attached or answers
//! with a JSON error body. Hooks into the gateway in two places:
//!
//! - endpoint level, as an axum middleware ([`middleware::sso_middleware`])
//! - backend level, by wrapping the backend [`executor::RequestExecutor`]

pub mod authenticator;
pub mod client;
pub mod config;
pub mod errors;
pub mod executor;
pub mod middleware;
pub mod response;
pub mod types;

// Re-export commonly used types
pub use authenticator::{Authenticator, Outcome};
pub use client::{SsoClient, TicketResolver};
pub use config::{ExtraConfig, SsoConfig, NAMESPACE};
pub use errors::{AuthError, ConfigError, ExecutorError};
pub use executor::{backend_executor, RequestExecutor, SsoExecutor};
pub use middleware::{sso_middleware, SsoIdentity};
pub use types::{ErrorBody, Identity};
