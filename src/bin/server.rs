use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};

use keygate::auth::service::AuthService;
use keygate::auth::token::TokenIssuer;
use keygate::config::ServerConfig;
use keygate::handlers::routes;
use keygate::security_logger::SecurityLogger;
use keygate::storage::MemoryCredentialStore;

#[tokio::main]
async fn main() {
    // Initialize env
    match dotenvy::dotenv() {
        Ok(_) => info!("Environment variables loaded from .env file"),
        Err(e) => warn!("Failed to load .env file: {}", e),
    };

    // Initialize logging
    env_logger::init();

    // Load config from the environment; a missing or weak signing secret
    // is fatal, never silently defaulted
    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    info!(
        "Configuration: host={}, port={}, token_ttl={}s",
        config.host,
        config.port,
        config.token_ttl.as_secs()
    );

    // Wire up the auth service
    let store = Arc::new(MemoryCredentialStore::new());
    let issuer = TokenIssuer::new(&config.jwt_secret, config.token_ttl);
    let logger = SecurityLogger::shared();

    let service = match AuthService::new(
        store,
        issuer,
        config.store_timeout,
        config.login_floor,
        logger,
    ) {
        Ok(service) => Arc::new(service),
        Err(e) => {
            error!("Failed to initialize auth service: {}", e);
            std::process::exit(1);
        }
    };

    // Build the server address
    let addr: SocketAddr = match format!("{}:{}", config.host, config.port).parse() {
        Ok(addr) => addr,
        Err(e) => {
            error!("Failed to parse server address: {}", e);
            std::process::exit(1);
        }
    };

    // Start the server
    info!("Starting Keygate server on {}", addr);

    warp::serve(routes(service)).run(addr).await;
}
