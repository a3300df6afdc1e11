//! Command-line and environment configuration.

use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;

use clap::Parser;

use crate::constants::{DEFAULT_BIND_ADDRESS, DEFAULT_PORT, DEFAULT_TORRENTS_DIR};

/// Serve a directory of .torrent files with web seeds as a Torznab indexer.
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Directory containing .torrent files
    #[arg(default_value = DEFAULT_TORRENTS_DIR)]
    pub torrents_dir: PathBuf,

    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind to
    #[arg(long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: IpAddr,

    /// Public base URL used in download links [default: http://localhost:PORT]
    #[arg(long, env = "BASE_URL")]
    pub base_url: Option<String>,
}

impl Config {
    /// Base URL without a trailing slash.
    pub fn base_url(&self) -> String {
        match self.base_url.as_deref().filter(|url| !url.is_empty()) {
            Some(url) => url.trim_end_matches('/').to_string(),
            None => format!("http://localhost:{}", self.port),
        }
    }

    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind, self.port)
    }
}
