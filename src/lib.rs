//! webseed2torznab - a Torznab indexer for local torrent files
//!
//! Scans a directory of `.torrent` files that carry web seeds (BEP-19
//! `url-list`), and serves them to media automation tools through a Torznab
//! feed, a JSON API and direct file downloads.
//!
//! # Modules
//!
//! - [`bencode`] - BEP-3 Bencode encoding/decoding
//! - [`metainfo`] - Torrent metadata extraction, info hashes, magnet links
//! - [`catalog`] - Reloadable in-memory set of parsed torrents
//! - [`torznab`] - Torznab capabilities and search feeds
//! - [`server`] - HTTP front end
//! - [`config`] - Command-line and environment configuration

pub mod bencode;
pub mod catalog;
pub mod config;
pub mod constants;
pub mod metainfo;
pub mod server;
pub mod torznab;

pub use bencode::{decode, decode_dict, encode, BencodeError, Dict, Value};
pub use catalog::{Catalog, CatalogError, Snapshot};
pub use config::Config;
pub use metainfo::{File, InfoHash, MagnetLink, MetainfoError, TorrentRecord};
pub use server::{AppState, Server, ServerError};
