//! Filesystem-backed store implementations.
//!
//! Layout under the data directory:
//!
//! ```text
//! <data_dir>/tables/<table>.json   one JSON array of {key, item} entries
//! <data_dir>/<bucket>/<key>        one file per uploaded object
//! ```
//!
//! Every write goes to a temporary sibling file first and is renamed into
//! place, so readers never observe a half-written table or report.

use super::{BlobStore, RecordStore, ScanPage, StoreError};
use crate::core::RecordKey;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fs;
use std::path::{Component, Path, PathBuf};
use std::sync::Mutex;

#[derive(Debug, Serialize, Deserialize)]
struct Entry {
    key: RecordKey,
    item: Value,
}

/// Record store keeping one JSON document per table.
#[derive(Debug)]
pub struct FsRecordStore {
    root: PathBuf,
    lock: Mutex<()>,
}

impl FsRecordStore {
    /// Open a store under `data_dir`. Directories are created on first write.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            root: data_dir.into().join("tables"),
            lock: Mutex::new(()),
        }
    }

    fn table_path(&self, table: &str) -> Result<PathBuf, StoreError> {
        if table.is_empty() || !is_plain_name(table) {
            return Err(StoreError::new(format!("invalid table name {table:?}")));
        }
        Ok(self.root.join(format!("{table}.json")))
    }

    fn read_table(&self, path: &Path) -> Result<Vec<Entry>, StoreError> {
        match fs::read_to_string(path) {
            Ok(contents) => serde_json::from_str(&contents).map_err(|e| {
                StoreError::new(format!("corrupt table file {}: {}", path.display(), e))
            }),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(Vec::new()),
            Err(e) => Err(StoreError::new(format!(
                "failed to read {}: {}",
                path.display(),
                e
            ))),
        }
    }
}

impl RecordStore for FsRecordStore {
    fn put(&self, table: &str, key: &RecordKey, item: Value) -> Result<(), StoreError> {
        let path = self.table_path(table)?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::new("record store lock poisoned"))?;

        let mut entries = self.read_table(&path)?;
        match entries.iter_mut().find(|e| &e.key == key) {
            Some(existing) => existing.item = item,
            None => entries.push(Entry {
                key: key.clone(),
                item,
            }),
        }

        let contents = serde_json::to_vec_pretty(&entries)?;
        write_atomically(&path, &contents)
    }

    fn scan_page(&self, table: &str, cursor: Option<&str>) -> Result<ScanPage, StoreError> {
        if let Some(cursor) = cursor {
            return Err(StoreError::new(format!(
                "filesystem store returns whole tables; unexpected cursor {cursor:?}"
            )));
        }
        let path = self.table_path(table)?;
        let _guard = self
            .lock
            .lock()
            .map_err(|_| StoreError::new("record store lock poisoned"))?;
        let items = self
            .read_table(&path)?
            .into_iter()
            .map(|entry| entry.item)
            .collect();
        Ok(ScanPage { items, next: None })
    }
}

/// Blob store writing one file per key under a bucket directory.
#[derive(Debug, Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(data_dir: impl AsRef<Path>, bucket: &str) -> Self {
        Self {
            root: data_dir.as_ref().join(bucket),
        }
    }

    /// Resolve an object key to its file, rejecting keys that would escape
    /// the bucket directory. A leading `/` is ignored.
    pub fn object_path(&self, key: &str) -> Result<PathBuf, StoreError> {
        let relative = Path::new(key.trim_start_matches('/'));
        let escapes = relative
            .components()
            .any(|c| !matches!(c, Component::Normal(_)));
        if key.trim_start_matches('/').is_empty() || escapes {
            return Err(StoreError::new(format!("invalid object key {key:?}")));
        }
        Ok(self.root.join(relative))
    }

    /// Read an uploaded object back.
    pub fn read(&self, key: &str) -> Result<Vec<u8>, StoreError> {
        let path = self.object_path(key)?;
        fs::read(&path)
            .map_err(|e| StoreError::new(format!("failed to read {}: {}", path.display(), e)))
    }
}

impl BlobStore for FsBlobStore {
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        let path = self.object_path(key)?;
        write_atomically(&path, bytes)
    }
}

fn is_plain_name(name: &str) -> bool {
    name.chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
        && name != "."
        && name != ".."
}

fn write_atomically(path: &Path, contents: &[u8]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            StoreError::new(format!("failed to create {}: {}", parent.display(), e))
        })?;
    }
    let mut tmp = path.as_os_str().to_owned();
    tmp.push(".tmp");
    let tmp = PathBuf::from(tmp);
    fs::write(&tmp, contents)
        .map_err(|e| StoreError::new(format!("failed to write {}: {}", tmp.display(), e)))?;
    fs::rename(&tmp, path).map_err(|e| {
        let _ = fs::remove_file(&tmp);
        StoreError::new(format!(
            "failed to move {} into place: {}",
            path.display(),
            e
        ))
    })
}
