pub mod config;
pub mod constants;
pub mod http;
pub mod web;

// Re-export commonly used types
pub use config::{BackendConfig, Config, ConfigManager, EndpointConfig};
pub use http::ReqwestExecutor;
pub use web::{create_router, start_web_server};
