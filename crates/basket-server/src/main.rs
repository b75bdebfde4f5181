//! Basket Server Binary
//!
//! Loads the transaction log once, then serves association queries.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use basket_server::{serve, AppState, ServerConfig};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let config = ServerConfig::from_env()?;
    let addr = config.addr.clone();
    let state = Arc::new(AppState::load(config)?);

    serve(&addr, state).await
}
