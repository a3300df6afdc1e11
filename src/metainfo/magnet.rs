use super::info_hash::InfoHash;
use super::torrent::TorrentRecord;

/// A magnet link for a torrent that can be fetched from a web seed.
///
/// Only the first web seed of a record is embedded.
///
/// # Examples
///
/// ```
/// use webseed2torznab::metainfo::{InfoHash, MagnetLink};
///
/// let magnet = MagnetLink {
///     info_hash: InfoHash::from_bytes([0xab; 20]),
///     display_name: Some("My File.mkv".into()),
///     web_seed: Some("http://example.com/files/".into()),
/// };
///
/// assert_eq!(
///     magnet.to_uri(),
///     "magnet:?xt=urn:btih:abababababababababababababababababababab\
///      &dn=My%20File.mkv&ws=http%3A%2F%2Fexample.com%2Ffiles%2F"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MagnetLink {
    pub info_hash: InfoHash,
    pub display_name: Option<String>,
    pub web_seed: Option<String>,
}

impl MagnetLink {
    pub fn from_record(record: &TorrentRecord) -> Self {
        Self {
            info_hash: record.info_hash,
            display_name: Some(record.name.clone()),
            web_seed: record.web_seeds.first().cloned(),
        }
    }

    pub fn to_uri(&self) -> String {
        let mut uri = format!("magnet:?xt=urn:btih:{}", self.info_hash.to_hex());

        if let Some(ref name) = self.display_name {
            uri.push_str(&format!("&dn={}", url_encode(name)));
        }

        if let Some(ref ws) = self.web_seed {
            uri.push_str(&format!("&ws={}", url_encode(ws)));
        }

        uri
    }
}

/// Percent-encodes everything outside the RFC 3986 unreserved set.
pub fn url_encode(s: &str) -> String {
    let mut result = String::with_capacity(s.len() * 3);

    for byte in s.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                result.push(byte as char);
            }
            _ => {
                result.push_str(&format!("%{:02X}", byte));
            }
        }
    }

    result
}
