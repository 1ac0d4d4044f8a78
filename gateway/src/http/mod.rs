//! Backend communication for the gateway
//!
//! Every endpoint forwards to exactly one backend. The request goes through a
//! [`sso::RequestExecutor`] chain:
//!
//! ```text
//! Endpoint handler → SsoExecutor (if enabled) → ReqwestExecutor → Backend
//!                          ↓
//!                   JSON rejection
//! ```

pub mod backend_client;

pub use backend_client::{strip_hop_by_hop, ReqwestExecutor};
