//! Record and blob store capabilities.
//!
//! The core never opens connections itself: callers construct a store and
//! pass it in as `&dyn RecordStore` / `&dyn BlobStore`, owning its lifecycle.
//! Two implementations of each are provided:
//!
//! - [`memory`]: in-process maps, used by tests and dry runs
//! - [`fs`]: a data directory on disk, used by the CLI
//!
//! # Pagination
//!
//! Scans are expressed page by page through [`RecordStore::scan_page`].
//! [`RecordStore::scan`] follows the `next` cursors until the table is
//! exhausted, so the core always sees the complete table. A backend with
//! server-side paging only needs to implement `scan_page`.

pub mod fs;
pub mod memory;

pub use fs::{FsBlobStore, FsRecordStore};
pub use memory::{MemoryBlobStore, MemoryRecordStore};

use crate::core::RecordKey;
use serde_json::Value;

/// Failure reported by a store backend.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct StoreError {
    message: String,
}

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<std::io::Error> for StoreError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err.to_string())
    }
}

impl From<serde_json::Error> for StoreError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// One page of a table scan.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ScanPage {
    pub items: Vec<Value>,
    /// Cursor for the following page; `None` on the last page.
    pub next: Option<String>,
}

/// Key-value table abstraction.
pub trait RecordStore: Send + Sync {
    /// Idempotent upsert of `item` under `key` in `table`.
    fn put(&self, table: &str, key: &RecordKey, item: Value) -> Result<(), StoreError>;

    /// Read one page of `table`, starting at `cursor` (`None` for the first
    /// page).
    fn scan_page(&self, table: &str, cursor: Option<&str>) -> Result<ScanPage, StoreError>;

    /// Read the whole of `table`, in store order.
    fn scan(&self, table: &str) -> Result<Vec<Value>, StoreError> {
        let mut items = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self.scan_page(table, cursor.as_deref())?;
            items.extend(page.items);
            match page.next {
                Some(next) if Some(&next) != cursor.as_ref() => cursor = Some(next),
                Some(next) => {
                    return Err(StoreError::new(format!(
                        "scan of {table} did not advance past cursor {next}"
                    )))
                }
                None => return Ok(items),
            }
        }
    }
}

/// Object store abstraction. Uploads overwrite an existing object.
pub trait BlobStore: Send + Sync {
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_scan_follows_cursors_until_exhausted() {
        let store = MemoryRecordStore::with_page_size(2);
        for i in 0..5 {
            store
                .put("t", &RecordKey::new(i.to_string(), "k"), json!({ "n": i }))
                .unwrap();
        }

        let first = store.scan_page("t", None).unwrap();
        assert_eq!(first.items.len(), 2);
        assert!(first.next.is_some());

        let all = store.scan("t").unwrap();
        let ns: Vec<i64> = all.iter().map(|v| v["n"].as_i64().unwrap()).collect();
        assert_eq!(ns, vec![0, 1, 2, 3, 4]);
    }

    struct StuckStore;

    impl RecordStore for StuckStore {
        fn put(&self, _: &str, _: &RecordKey, _: Value) -> Result<(), StoreError> {
            Ok(())
        }

        fn scan_page(&self, _: &str, _: Option<&str>) -> Result<ScanPage, StoreError> {
            Ok(ScanPage {
                items: vec![json!({})],
                next: Some("same".into()),
            })
        }
    }

    #[test]
    fn test_scan_rejects_cursor_that_does_not_advance() {
        let err = StuckStore.scan("t").unwrap_err();
        assert!(err.message().contains("did not advance"));
    }
}
