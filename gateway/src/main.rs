// File: gateway/src/main.rs
use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use gateway::constants::defaults;
use gateway::{start_web_server, ConfigManager};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging with reduced verbosity
    let env_filter = EnvFilter::from_default_env()
        .add_directive("gateway=info".parse()?)
        .add_directive("sso=info".parse()?)
        .add_directive("tower_http=warn".parse()?)
        .add_directive("hyper=warn".parse()?)
        .add_directive("reqwest=warn".parse()?);

    fmt().with_env_filter(env_filter).init();

    info!("Starting SSO gateway");

    let config_dir = std::env::var(defaults::CONFIG_DIR_ENV)
        .unwrap_or_else(|_| defaults::CONFIG_DIR.to_string());

    // Load configuration
    let config_manager = ConfigManager::new(config_dir).await?;
    let config = config_manager.get_current_config();

    let protected = config
        .endpoints
        .iter()
        .filter(|e| {
            sso::config::is_enabled(&e.extra_config)
                || sso::config::is_enabled(&e.backend.extra_config)
        })
        .count();
    info!(
        "Configuration loaded: {} endpoints, {} behind SSO",
        config.endpoints.len(),
        protected
    );

    if config.endpoints.is_empty() {
        warn!("No endpoints configured - only the health route will be served");
    }

    start_web_server(config).await?;

    info!("Gateway stopped");
    Ok(())
}
