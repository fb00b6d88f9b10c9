//! In-memory environment and failure-injecting stores.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;

use crate::config::CallmatchConfig;
use crate::core::RecordKey;
use crate::env::{Clock, MatchEnv};
use crate::store::{
    BlobStore, MemoryBlobStore, MemoryRecordStore, RecordStore, ScanPage, StoreError,
};

/// Run time used by [`TestEnv`]: 2024-01-06T12:00:00Z.
pub fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 1, 6, 12, 0, 0)
        .single()
        .unwrap_or_default()
}

/// A [`MatchEnv`] over in-memory stores, with the stores kept at hand for
/// inspection.
pub struct TestEnv {
    pub env: MatchEnv,
    pub records: Arc<MemoryRecordStore>,
    pub blobs: Arc<MemoryBlobStore>,
}

impl TestEnv {
    pub fn new() -> Self {
        Self::with_config(CallmatchConfig::default())
    }

    pub fn with_config(config: CallmatchConfig) -> Self {
        let records = Arc::new(MemoryRecordStore::new());
        let blobs = Arc::new(MemoryBlobStore::new());
        let env = MatchEnv::new(config, records.clone(), blobs.clone())
            .with_clock(Clock::Fixed(fixed_now()));
        Self {
            env,
            records,
            blobs,
        }
    }
}

impl Default for TestEnv {
    fn default() -> Self {
        Self::new()
    }
}

/// Record store that accepts a number of writes and then fails every
/// operation.
#[derive(Debug, Default)]
pub struct FailingRecordStore {
    inner: MemoryRecordStore,
    remaining: AtomicUsize,
}

impl FailingRecordStore {
    pub fn failing_after(writes: usize) -> Self {
        Self {
            inner: MemoryRecordStore::new(),
            remaining: AtomicUsize::new(writes),
        }
    }

    pub fn inner(&self) -> &MemoryRecordStore {
        &self.inner
    }

    fn take_write(&self) -> bool {
        self.remaining
            .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
            .is_ok()
    }
}

impl RecordStore for FailingRecordStore {
    fn put(&self, table: &str, key: &RecordKey, item: Value) -> Result<(), StoreError> {
        if self.take_write() {
            self.inner.put(table, key, item)
        } else {
            Err(StoreError::new("injected write failure"))
        }
    }

    fn scan_page(&self, _table: &str, _cursor: Option<&str>) -> Result<ScanPage, StoreError> {
        Err(StoreError::new("injected read failure"))
    }
}

/// Blob store rejecting every upload.
#[derive(Debug, Default, Clone, Copy)]
pub struct FailingBlobStore;

impl BlobStore for FailingBlobStore {
    fn upload(&self, _key: &str, _bytes: &[u8]) -> Result<(), StoreError> {
        Err(StoreError::new("injected upload failure"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_failing_store_allows_configured_writes() {
        let store = FailingRecordStore::failing_after(2);
        let key = RecordKey::new("a", "b");
        assert!(store.put("t", &key, json!(1)).is_ok());
        assert!(store.put("t", &key, json!(2)).is_ok());
        assert!(store.put("t", &key, json!(3)).is_err());
        assert_eq!(store.inner().len("t"), 1);
        assert!(store.scan("t").is_err());
    }
}
