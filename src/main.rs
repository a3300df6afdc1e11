use std::sync::Arc;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use webseed2torznab::{AppState, Catalog, Config, Server};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let base_url = config.base_url();

    let catalog = Arc::new(Catalog::new());
    if let Err(e) = catalog.load_all(&config.torrents_dir) {
        error!("Failed to load torrents: {}", e);
        return Err(e.into());
    }

    let state = AppState::new(catalog, config.torrents_dir.clone(), base_url.clone());
    let server = Server::bind(config.socket_addr(), state).await?;

    info!("Serving torrents from {}", config.torrents_dir.display());
    info!("JSON API: {}/api/torrents", base_url);
    info!("Torznab API: {}/api/torznab", base_url);
    info!("Torznab Caps: {}/api/torznab?t=caps", base_url);

    server.run().await?;
    Ok(())
}
