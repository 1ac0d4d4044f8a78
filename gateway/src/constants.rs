//! Central repository for defaults and limits used by the gateway host

use std::time::Duration;

/// HTTP client constants
pub mod http {
    use super::Duration;

    /// Timeout for establishing backend connections
    pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Largest request or response body the proxy buffers
    pub const MAX_BODY_BYTES: usize = 10 * 1024 * 1024;
}

/// Default configuration values
pub mod defaults {
    /// Directory holding main.toml and endpoints/
    pub const CONFIG_DIR: &str = "config";

    /// Environment variable overriding the configuration directory
    pub const CONFIG_DIR_ENV: &str = "GATEWAY_CONFIG_DIR";

    pub const HOST: &str = "0.0.0.0";

    pub const PORT: u16 = 8080;

    /// Backend request timeout in seconds
    pub const BACKEND_TIMEOUT_SECONDS: u64 = 30;
}

/// Route used for liveness checks
pub const HEALTH_PATH: &str = "/__health";
