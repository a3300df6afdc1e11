//! In-memory catalog of parsed torrent files.
//!
//! The catalog holds an immutable [`Snapshot`] of [`TorrentRecord`]s behind a
//! single shared reference. A reload builds a complete new snapshot from the
//! directory and swaps it in at once, so a reader sees either the old set or
//! the new set and never a mix.
//!
//! # Examples
//!
//! ```no_run
//! use webseed2torznab::catalog::Catalog;
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Catalog::new();
//! let count = catalog.load_all("./torrents")?;
//! println!("loaded {} torrents", count);
//!
//! for record in catalog.search("ubuntu") {
//!     println!("{} {}", record.info_hash, record.name);
//! }
//! # Ok(())
//! # }
//! ```

mod error;

pub use error::CatalogError;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, info, warn};

use crate::constants::TORRENT_EXTENSION;
use crate::metainfo::TorrentRecord;

/// An immutable set of records in load order.
#[derive(Debug, Default)]
pub struct Snapshot {
    records: Vec<Arc<TorrentRecord>>,
}

impl Snapshot {
    pub fn new(records: Vec<TorrentRecord>) -> Self {
        Self {
            records: records.into_iter().map(Arc::new).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn records(&self) -> &[Arc<TorrentRecord>] {
        &self.records
    }

    /// Case-insensitive substring match on record names, in load order.
    ///
    /// An empty term matches every record.
    pub fn search(&self, term: &str) -> Vec<Arc<TorrentRecord>> {
        if term.is_empty() {
            return self.records.clone();
        }

        let needle = term.to_lowercase();
        self.records
            .iter()
            .filter(|r| r.name.to_lowercase().contains(&needle))
            .cloned()
            .collect()
    }
}

/// Shared, reloadable set of torrent records.
pub struct Catalog {
    current: RwLock<Arc<Snapshot>>,
    reload_lock: Mutex<()>,
}

impl Catalog {
    /// Creates an empty catalog.
    pub fn new() -> Self {
        Self {
            current: RwLock::new(Arc::new(Snapshot::default())),
            reload_lock: Mutex::new(()),
        }
    }

    /// Returns a handle to the current snapshot.
    ///
    /// The handle keeps seeing the same records after later reloads.
    pub fn snapshot(&self) -> Arc<Snapshot> {
        self.current.read().clone()
    }

    pub fn len(&self) -> usize {
        self.snapshot().len()
    }

    pub fn is_empty(&self) -> bool {
        self.snapshot().is_empty()
    }

    pub fn search(&self, term: &str) -> Vec<Arc<TorrentRecord>> {
        self.snapshot().search(term)
    }

    pub fn all(&self) -> Vec<Arc<TorrentRecord>> {
        self.search("")
    }

    /// Scans `dir` for torrent files and replaces the catalog contents.
    ///
    /// Files that cannot be read or parsed are logged and skipped. The
    /// returned count may be zero.
    ///
    /// # Errors
    ///
    /// Returns [`CatalogError::UnreadableSource`] if `dir` cannot be listed;
    /// the current contents are left untouched in that case.
    pub fn load_all(&self, dir: impl AsRef<Path>) -> Result<usize, CatalogError> {
        let _reload = self.reload_lock.lock();

        let snapshot = Arc::new(Snapshot::new(scan_directory(dir.as_ref())?));
        let count = snapshot.len();

        *self.current.write() = snapshot;

        info!("Loaded {} torrent files", count);
        Ok(count)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::new()
    }
}

/// Parses every torrent file in `dir`, in file-name order.
pub fn scan_directory(dir: &Path) -> Result<Vec<TorrentRecord>, CatalogError> {
    let unreadable = |source| CatalogError::UnreadableSource {
        path: dir.to_path_buf(),
        source,
    };

    let mut candidates: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(dir).map_err(unreadable)? {
        let entry = entry.map_err(unreadable)?;
        let path = entry.path();

        if !is_torrent_file_name(&entry.file_name().to_string_lossy()) {
            continue;
        }

        // Follows symlinks.
        match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => candidates.push(path),
            Ok(_) => {}
            Err(e) => warn!("Skipping {}: {}", path.display(), e),
        }
    }

    candidates.sort_by(|a, b| a.file_name().cmp(&b.file_name()));

    let mut records = Vec::with_capacity(candidates.len());
    for path in candidates {
        match TorrentRecord::from_file(&path) {
            Ok(record) => {
                debug!("Loaded {} ({})", record.name, record.info_hash);
                records.push(record);
            }
            Err(e) => {
                let file = path.file_name().unwrap_or_default().to_string_lossy();
                if e.is_malformed() {
                    warn!("Error parsing torrent file {}: {}", file, e);
                } else {
                    warn!("Error reading torrent file {}: {}", file, e);
                }
            }
        }
    }

    Ok(records)
}

/// Returns `true` if `name` ends with the torrent extension, ignoring case.
pub fn is_torrent_file_name(name: &str) -> bool {
    name.to_lowercase().ends_with(TORRENT_EXTENSION)
}
