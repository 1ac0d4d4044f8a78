// File: gateway/src/web/mod.rs
pub mod handlers;
pub mod server;

pub use server::{create_router, start_web_server};

use sso::RequestExecutor;
use std::sync::Arc;

use crate::config::BackendConfig;

// State shared by the handler of a single endpoint
#[derive(Clone)]
pub struct EndpointState {
    pub name: Arc<str>,
    pub backend: Arc<BackendConfig>,
    pub executor: Arc<dyn RequestExecutor>,
}
