//! Torrent metadata extraction ([BEP-3]).
//!
//! Turns the bytes of a `.torrent` file into a [`TorrentRecord`]: display
//! name, info-hash, file list, web seeds and the optional descriptive fields.
//!
//! # Info-hash
//!
//! The [`InfoHash`] is the SHA-1 of the *canonical* bencoding of the `info`
//! dictionary. It is computed by re-encoding the decoded `info` value with
//! sorted keys, never by hashing a byte range of the file, and there is no
//! fallback when `info` is missing or malformed: such files are rejected.
//!
//! # Examples
//!
//! ```no_run
//! use webseed2torznab::metainfo::TorrentRecord;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let record = TorrentRecord::from_file("torrents/example.torrent")?;
//!
//! println!("Name: {}", record.name);
//! println!("Info hash: {}", record.info_hash);
//! println!("Total size: {} bytes", record.total_size);
//!
//! for file in &record.files {
//!     println!("  {} ({} bytes)", file.path.join("/"), file.length);
//! }
//!
//! if let Some(magnet) = record.magnet_uri() {
//!     println!("Magnet: {}", magnet);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Torrent Structure
//!
//! Fields read from a torrent file:
//!
//! - **info** - Core metadata (hashed to create the info hash)
//!   - `name` / `name.utf-8` - Suggested file or directory name
//!   - `length` - Size of a single-file torrent, OR
//!   - `files` - List of `{length, path}` for a multi-file torrent
//! - **url-list** - Web seeds ([BEP-19]); a string or a list of strings
//! - **creation date** - Unix timestamp when created
//! - **comment** - Optional comment
//! - **created by** - Program that created the torrent
//!
//! [BEP-3]: http://bittorrent.org/beps/bep_0003.html
//! [BEP-19]: http://bittorrent.org/beps/bep_0019.html

mod error;
mod info_hash;
mod magnet;
mod torrent;

pub use error::MetainfoError;
pub use info_hash::InfoHash;
pub use magnet::{url_encode, MagnetLink};
pub use torrent::{File, TorrentRecord};

#[cfg(test)]
mod tests;
