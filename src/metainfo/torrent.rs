use super::error::MetainfoError;
use super::info_hash::InfoHash;
use super::magnet::MagnetLink;
use crate::bencode::{decode_dict, Dict, Value};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Serialize, Serializer};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Metadata extracted from one `.torrent` file.
///
/// Records are immutable once built. The info-hash identifies the content;
/// `source_path` only says where the file was found.
///
/// # Examples
///
/// ```
/// use webseed2torznab::metainfo::TorrentRecord;
///
/// # fn main() -> Result<(), Box<dyn std::error::Error>> {
/// let data = b"d8:url-list12:http://seed/4:infod6:lengthi5e4:name5:a.txt\
///              12:piece lengthi5e6:pieces20:aaaaaaaaaaaaaaaaaaaaee";
/// let record = TorrentRecord::from_bytes(data, "a.torrent")?;
///
/// assert_eq!(record.name, "a.txt");
/// assert_eq!(record.total_size, 5);
/// assert_eq!(record.web_seeds, vec!["http://seed/".to_string()]);
/// assert_eq!(record.creation_date, None);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TorrentRecord {
    /// Display name from the info dictionary.
    pub name: String,
    pub info_hash: InfoHash,
    /// Sum of all file lengths.
    #[serde(rename = "size")]
    pub total_size: u64,
    pub files: Vec<File>,
    pub web_seeds: Vec<String>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub created_by: String,
    /// Unix timestamp from `creation date`.
    #[serde(rename = "created_date", serialize_with = "serialize_timestamp")]
    pub creation_date: Option<i64>,
    #[serde(skip_serializing_if = "String::is_empty")]
    pub comment: String,
    #[serde(rename = "file_path", serialize_with = "serialize_path")]
    pub source_path: PathBuf,
}

/// A file within a torrent.
///
/// For single-file torrents there is one file whose path is the torrent name.
/// For multi-file torrents the path is relative to the torrent's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct File {
    pub path: Vec<String>,
    pub length: u64,
}

impl TorrentRecord {
    /// Builds a record from raw `.torrent` bytes.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The data is not valid bencode or its top level is not a dictionary
    /// - `info` is missing or not a dictionary
    /// - neither `length` nor a valid `files` list is present
    ///
    /// Name, web seeds, comment, creator and creation date never cause an
    /// error; irregular values become empty or absent.
    pub fn from_bytes(
        data: &[u8],
        source_path: impl Into<PathBuf>,
    ) -> Result<Self, MetainfoError> {
        let dict = decode_dict(data)?;

        let info_value = dict
            .get(b"info")
            .ok_or(MetainfoError::MissingField("info"))?;

        let info = info_value
            .as_dict()
            .ok_or(MetainfoError::InvalidField("info"))?;

        if !info.is_canonical() {
            debug!("info dictionary keys are not sorted; hashing canonical form");
        }
        let info_hash = InfoHash::from_info(info_value);

        let name = utf8_preferred(info, b"name.utf-8", b"name").unwrap_or_default();

        let (files, total_size) = parse_files(info, &name)?;

        Ok(Self {
            name,
            info_hash,
            total_size,
            files,
            web_seeds: web_seeds(dict.get(b"url-list")),
            created_by: text_field(&dict, b"created by"),
            creation_date: dict.get(b"creation date").and_then(Value::as_integer),
            comment: text_field(&dict, b"comment"),
            source_path: source_path.into(),
        })
    }

    /// Reads and parses a `.torrent` file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, MetainfoError> {
        let path = path.as_ref();
        let data = std::fs::read(path)?;
        Self::from_bytes(&data, path)
    }

    /// File name component of `source_path`, used to build download links.
    pub fn file_name(&self) -> Option<&str> {
        self.source_path.file_name().and_then(|n| n.to_str())
    }

    /// Creation date as a UTC timestamp, if present and representable.
    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.creation_date
            .and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0))
    }

    /// Magnet link carrying the first web seed.
    ///
    /// Returns `None` when the torrent has no web seeds.
    pub fn magnet_uri(&self) -> Option<String> {
        if self.web_seeds.is_empty() {
            return None;
        }
        Some(MagnetLink::from_record(self).to_uri())
    }
}

fn parse_files(info: &Dict, name: &str) -> Result<(Vec<File>, u64), MetainfoError> {
    if let Some(length) = info.get(b"length") {
        let length = length
            .as_integer()
            .and_then(|l| u64::try_from(l).ok())
            .ok_or(MetainfoError::InvalidField("length"))?;

        let file = File {
            path: vec![name.to_string()],
            length,
        };
        return Ok((vec![file], length));
    }

    let files_list = info
        .get(b"files")
        .ok_or(MetainfoError::MissingField("length or files"))?
        .as_list()
        .ok_or(MetainfoError::InvalidField("files"))?;

    let mut files = Vec::with_capacity(files_list.len());
    let mut total = 0u64;

    for file_value in files_list {
        let file_dict = file_value
            .as_dict()
            .ok_or(MetainfoError::InvalidField("files"))?;

        let length = file_dict
            .get(b"length")
            .ok_or(MetainfoError::MissingField("file length"))?
            .as_integer()
            .and_then(|l| u64::try_from(l).ok())
            .ok_or(MetainfoError::InvalidField("file length"))?;

        let path = file_dict
            .get(b"path.utf-8")
            .and_then(path_segments)
            .or_else(|| file_dict.get(b"path").and_then(path_segments))
            .filter(|segments| !segments.is_empty())
            .ok_or(MetainfoError::InvalidField("file path"))?;

        total = total
            .checked_add(length)
            .ok_or(MetainfoError::InvalidField("file length"))?;

        files.push(File { path, length });
    }

    Ok((files, total))
}

/// Path segments must all be byte strings; non-UTF-8 bytes are replaced.
fn path_segments(value: &Value) -> Option<Vec<String>> {
    value
        .as_list()?
        .iter()
        .map(|segment| {
            segment
                .as_bytes()
                .map(|b| String::from_utf8_lossy(b).into_owned())
        })
        .collect()
}

/// Prefers the `.utf-8` variant of a key when it holds valid UTF-8, otherwise
/// falls back to the plain key with lossy conversion.
fn utf8_preferred(dict: &Dict, utf8_key: &[u8], key: &[u8]) -> Option<String> {
    dict.get(utf8_key)
        .and_then(Value::as_str)
        .map(String::from)
        .or_else(|| {
            dict.get(key)
                .and_then(Value::as_bytes)
                .map(|b| String::from_utf8_lossy(b).into_owned())
        })
}

fn text_field(dict: &Dict, key: &[u8]) -> String {
    dict.get(key)
        .and_then(Value::as_str)
        .map(String::from)
        .unwrap_or_default()
}

/// Normalizes `url-list`, which appears as a single string, a list of
/// strings, or not at all.
fn web_seeds(value: Option<&Value>) -> Vec<String> {
    match value {
        Some(single @ Value::Bytes(_)) => {
            single.as_str().map(String::from).into_iter().collect()
        }
        Some(Value::List(urls)) => urls
            .iter()
            .filter_map(|u| u.as_str().map(String::from))
            .collect(),
        Some(Value::Integer(_)) | Some(Value::Dict(_)) | None => Vec::new(),
    }
}

fn serialize_timestamp<S: Serializer>(
    value: &Option<i64>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value.and_then(|secs| DateTime::<Utc>::from_timestamp(secs, 0)) {
        Some(dt) => serializer.serialize_str(&dt.to_rfc3339_opts(SecondsFormat::Secs, true)),
        None => serializer.serialize_none(),
    }
}

fn serialize_path<S: Serializer>(path: &Path, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&path.to_string_lossy())
}
