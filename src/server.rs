//! HTTP front end for the catalog.
//!
//! Serves the JSON API, the Torznab feed and the `.torrent` files themselves
//! over a small HTTP/1.1 server on tokio.
//!
//! # Routes
//!
//! | Method | Path | Response |
//! |--------|------|----------|
//! | `GET` | `/api/torrents?q=` | JSON listing, optionally filtered |
//! | `POST` | `/api/refresh` | Reload the catalog from disk |
//! | `GET` | `/api/torznab?t=caps` | Torznab capabilities |
//! | `GET` | `/api/torznab?t=search&q=` | Torznab search feed |
//! | `GET` | `/torrent/{filename}` | Download a `.torrent` file |
//! | `GET` | `/health` | `{"status":"ok"}` |
//! | `GET` | `/` | HTML endpoint overview |
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use webseed2torznab::catalog::Catalog;
//! use webseed2torznab::server::{AppState, Server};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(Catalog::new());
//! catalog.load_all("./torrents")?;
//!
//! let state = AppState::new(catalog, "./torrents", "http://localhost:8080");
//! let server = Server::bind("0.0.0.0:8080".parse()?, state).await?;
//! server.run().await?;
//! # Ok(())
//! # }
//! ```

mod error;
pub mod http;

pub use error::{HttpError, ServerError};
pub use http::{Request, Response};

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::io::BufReader;
use tokio::net::{TcpListener, TcpStream};
use tokio::time::timeout;
use tracing::{debug, error, info, warn};

use crate::catalog::{is_torrent_file_name, Catalog};
use crate::constants::{INDEXER_DESCRIPTION, INDEXER_TITLE, REQUEST_READ_TIMEOUT, TORRENT_MIME};
use crate::metainfo::TorrentRecord;
use crate::torznab;

const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Shared state handed to every request.
pub struct AppState {
    pub catalog: Arc<Catalog>,
    pub torrents_dir: PathBuf,
    /// Public base URL without a trailing slash.
    pub base_url: String,
}

impl AppState {
    pub fn new(
        catalog: Arc<Catalog>,
        torrents_dir: impl Into<PathBuf>,
        base_url: impl Into<String>,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            catalog,
            torrents_dir: torrents_dir.into(),
            base_url,
        }
    }
}

pub struct Server {
    listener: TcpListener,
    state: Arc<AppState>,
}

impl Server {
    pub async fn bind(addr: SocketAddr, state: AppState) -> Result<Self, ServerError> {
        let listener = TcpListener::bind(addr).await?;
        info!("HTTP server bound to {}", listener.local_addr()?);

        Ok(Self {
            listener,
            state: Arc::new(state),
        })
    }

    pub fn local_addr(&self) -> Result<SocketAddr, ServerError> {
        Ok(self.listener.local_addr()?)
    }

    /// Accepts connections until the task is dropped.
    pub async fn run(self) -> Result<(), ServerError> {
        loop {
            let (stream, peer) = match self.listener.accept().await {
                Ok(conn) => conn,
                Err(e) => {
                    warn!("Failed to accept connection: {}", e);
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                    continue;
                }
            };

            let state = self.state.clone();
            tokio::spawn(async move {
                if let Err(e) = handle_connection(stream, peer, &state).await {
                    debug!("Connection from {} failed: {}", peer, e);
                }
            });
        }
    }
}

async fn handle_connection(
    stream: TcpStream,
    peer: SocketAddr,
    state: &AppState,
) -> std::io::Result<()> {
    let (read_half, mut write_half) = stream.into_split();
    let mut reader = BufReader::new(read_half);

    let response = match timeout(REQUEST_READ_TIMEOUT, http::read_request(&mut reader)).await {
        Ok(Ok(request)) => {
            let response = route(state, &request).await;
            debug!(
                "{} {} {} -> {}",
                peer, request.method, request.path, response.status
            );
            response
        }
        Ok(Err(HttpError::ConnectionClosed)) => return Ok(()),
        Ok(Err(HttpError::Io(e))) => return Err(e),
        Ok(Err(e)) => {
            debug!("Bad request from {}: {}", peer, e);
            error_response(&e)
        }
        Err(_) => error_response(&HttpError::Timeout),
    };

    response.write_to(&mut write_half).await
}

fn error_response(err: &HttpError) -> Response {
    let status = match err {
        HttpError::HeadTooLarge(_) => 431,
        HttpError::BodyTooLarge(_) => 413,
        HttpError::Timeout => 408,
        _ => 400,
    };
    Response::text(status, err.to_string())
}

/// Dispatches a parsed request to its handler.
pub async fn route(state: &AppState, request: &Request) -> Response {
    let method = request.method.as_str();
    let path = request.path.as_str();

    if let Some(filename) = path.strip_prefix("/torrent/") {
        return match method {
            "GET" => serve_torrent_file(state, filename).await,
            _ => method_not_allowed(),
        };
    }

    match (method, path) {
        ("GET", "/") => index_page(state),
        ("GET", "/health") => Response::json(r#"{"status":"ok"}"#),
        ("GET", "/api/torrents") => list_torrents(state, request.query_param("q").unwrap_or("")),
        ("POST", "/api/refresh") => refresh(state).await,
        ("GET", "/api/torznab") => torznab_api(state, request),
        (_, "/" | "/health" | "/api/torrents" | "/api/refresh" | "/api/torznab") => {
            method_not_allowed()
        }
        _ => Response::not_found(),
    }
}

fn method_not_allowed() -> Response {
    Response::text(405, "method not allowed")
}

#[derive(Serialize)]
struct ListResponse<'a> {
    status: &'static str,
    count: usize,
    torrents: Vec<&'a TorrentRecord>,
}

#[derive(Serialize)]
struct RefreshResponse {
    status: &'static str,
    message: &'static str,
    count: usize,
}

fn json_response<T: Serialize>(value: &T) -> Response {
    match serde_json::to_vec(value) {
        Ok(body) => Response::json(body),
        Err(e) => {
            error!("Failed to serialize response: {}", e);
            Response::text(500, "failed to serialize response")
        }
    }
}

fn list_torrents(state: &AppState, query: &str) -> Response {
    let records = state.catalog.search(query);
    json_response(&ListResponse {
        status: "success",
        count: records.len(),
        torrents: records.iter().map(|r| r.as_ref()).collect(),
    })
}

async fn refresh(state: &AppState) -> Response {
    let catalog = state.catalog.clone();
    let dir = state.torrents_dir.clone();

    match tokio::task::spawn_blocking(move || catalog.load_all(&dir)).await {
        Ok(Ok(count)) => json_response(&RefreshResponse {
            status: "success",
            message: "Torrents refreshed successfully",
            count,
        }),
        Ok(Err(e)) => {
            error!("Refresh failed: {}", e);
            Response::text(500, format!("Error refreshing torrents: {}", e))
        }
        Err(e) => {
            error!("Refresh task failed: {}", e);
            Response::text(500, "Error refreshing torrents")
        }
    }
}

fn torznab_api(state: &AppState, request: &Request) -> Response {
    match request.query_param("t") {
        Some("caps") => Response::xml(torznab::render_caps(&state.base_url)),
        _ => {
            let records = state.catalog.search(request.query_param("q").unwrap_or(""));
            Response::xml(torznab::render_search(&state.base_url, &records))
        }
    }
}

async fn serve_torrent_file(state: &AppState, filename: &str) -> Response {
    if matches!(filename, "" | "." | "..") || filename.contains(['/', '\\', '\0']) {
        return Response::text(400, "Invalid file name");
    }

    let path = state.torrents_dir.join(filename);
    match tokio::fs::metadata(&path).await {
        Ok(meta) if meta.is_file() => {}
        Ok(_) => return Response::not_found(),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Response::not_found(),
        Err(e) => {
            warn!("Cannot stat {}: {}", path.display(), e);
            return Response::text(500, "Cannot read file");
        }
    }

    if !is_torrent_file_name(filename) {
        return Response::text(400, "Invalid file type");
    }

    match tokio::fs::read(&path).await {
        Ok(data) => Response::new(200, TORRENT_MIME, data).with_header(
            "Content-Disposition",
            format!("attachment; filename=\"{}\"", filename.replace('"', "")),
        ),
        Err(e) => {
            warn!("Cannot read {}: {}", path.display(), e);
            Response::text(500, "Cannot read file")
        }
    }
}

fn index_page(state: &AppState) -> Response {
    let base = torznab::xml_escape(&state.base_url);
    let count = state.catalog.len();

    Response::html(format!(
        r#"<!DOCTYPE html>
<html>
<head>
    <title>{title} API</title>
    <style>
        body {{ font-family: Arial, sans-serif; margin: 40px; }}
        pre {{ background-color: #f4f4f4; padding: 10px; border-radius: 5px; overflow-x: auto; }}
    </style>
</head>
<body>
    <h1>{title} API</h1>
    <p>A Torznab API for local torrent files with web seed URLs.</p>

    <h2>Endpoints</h2>
    <ul>
        <li><strong>GET /api/torrents</strong> - List all torrents in JSON format
            <br><em>Query parameters: ?q=search_term</em></li>
        <li><strong>POST /api/refresh</strong> - Refresh torrent list</li>
        <li><strong>GET /api/torznab</strong> - Torznab API endpoint
            <br><em>Query parameters: ?t=search&amp;q=search_term or ?t=caps</em></li>
        <li><strong>GET /torrent/{{filename}}</strong> - Download torrent file</li>
        <li><strong>GET /health</strong> - Health check</li>
    </ul>

    <h2>Examples</h2>
    <pre>
# Get all torrents as JSON
curl {base}/api/torrents

# Search torrents
curl "{base}/api/torrents?q=avengers"

# Torznab capabilities
curl "{base}/api/torznab?t=caps"

# Torznab search
curl "{base}/api/torznab?t=search&amp;q=cube"

# Refresh torrent list
curl -X POST {base}/api/refresh
    </pre>

    <p>{description}. Currently serving <strong>{count}</strong> torrent files.</p>
</body>
</html>
"#,
        title = INDEXER_TITLE,
        description = INDEXER_DESCRIPTION,
        base = base,
        count = count,
    ))
}
