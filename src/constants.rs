//! Shared constants.
//!
//! Defaults for the server, the Torznab feed contents, and decoder limits.

use std::time::Duration;

// ============================================================================
// Bencode
// ============================================================================

/// Maximum container nesting accepted by the decoder.
pub const BENCODE_MAX_DEPTH: usize = 256;

// ============================================================================
// Catalog
// ============================================================================

/// File extension of candidate torrent files, matched case-insensitively.
pub const TORRENT_EXTENSION: &str = ".torrent";

/// Default directory scanned for torrent files.
pub const DEFAULT_TORRENTS_DIR: &str = "./torrents";

// ============================================================================
// Server
// ============================================================================

/// Default HTTP listen port
pub const DEFAULT_PORT: u16 = 8080;

/// Default bind address
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Upper bound on the request line plus headers.
pub const MAX_REQUEST_HEAD_BYTES: usize = 16 * 1024;

/// Time allowed for a client to send its request head.
pub const REQUEST_READ_TIMEOUT: Duration = Duration::from_secs(30);

/// Upper bound on a request body that is read and discarded.
pub const MAX_REQUEST_BODY_BYTES: usize = 64 * 1024;

/// Content type of served `.torrent` files and Torznab enclosures.
pub const TORRENT_MIME: &str = "application/x-bittorrent";

// ============================================================================
// Torznab
// ============================================================================

/// Indexer title shown in feeds and capabilities.
pub const INDEXER_TITLE: &str = "WebSeed2Torznab";

/// Indexer description shown in feeds and capabilities.
pub const INDEXER_DESCRIPTION: &str = "Local torrent files with web seeds";

/// Torznab XML namespace.
pub const TORZNAB_NAMESPACE: &str = "http://torznab.com/schemas/2015/feed";

/// Category attached to every item ("Other").
pub const DEFAULT_CATEGORY: u32 = 7000;

/// Categories advertised in the capabilities document.
pub const CATEGORIES: &[(u32, &str)] = &[(2000, "Movies"), (5000, "TV"), (7000, "Other")];

/// Result limits advertised in the capabilities document.
pub const RESULT_LIMIT: usize = 100;
