//! In-memory store implementations.
//!
//! Tables keep first-insertion order, so a scan returns records the way
//! they were first written; an upsert of an existing key replaces the item
//! in place.

use super::{BlobStore, RecordStore, ScanPage, StoreError};
use crate::core::RecordKey;
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};
use std::sync::RwLock;

type Table = Vec<(RecordKey, Value)>;

/// In-memory record store.
#[derive(Debug, Default)]
pub struct MemoryRecordStore {
    tables: RwLock<HashMap<String, Table>>,
    page_size: Option<usize>,
}

impl MemoryRecordStore {
    /// Store that returns every table in a single page.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store that splits scans into pages of `page_size` items.
    pub fn with_page_size(page_size: usize) -> Self {
        Self {
            tables: RwLock::new(HashMap::new()),
            page_size: Some(page_size.max(1)),
        }
    }

    /// Number of records in `table`.
    pub fn len(&self, table: &str) -> usize {
        self.tables
            .read()
            .map(|tables| tables.get(table).map_or(0, Vec::len))
            .unwrap_or(0)
    }

    /// Whether `table` holds no records.
    pub fn is_empty(&self, table: &str) -> bool {
        self.len(table) == 0
    }

    /// Fetch a single record.
    pub fn get(&self, table: &str, key: &RecordKey) -> Option<Value> {
        let tables = self.tables.read().ok()?;
        tables
            .get(table)?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }
}

impl RecordStore for MemoryRecordStore {
    fn put(&self, table: &str, key: &RecordKey, item: Value) -> Result<(), StoreError> {
        let mut tables = self
            .tables
            .write()
            .map_err(|_| StoreError::new("record store lock poisoned"))?;
        let rows = tables.entry(table.to_string()).or_default();
        match rows.iter_mut().find(|(k, _)| k == key) {
            Some((_, existing)) => *existing = item,
            None => rows.push((key.clone(), item)),
        }
        Ok(())
    }

    fn scan_page(&self, table: &str, cursor: Option<&str>) -> Result<ScanPage, StoreError> {
        let tables = self
            .tables
            .read()
            .map_err(|_| StoreError::new("record store lock poisoned"))?;
        let rows = tables.get(table).map(Vec::as_slice).unwrap_or(&[]);

        let start = match cursor {
            Some(c) => c
                .parse::<usize>()
                .map_err(|_| StoreError::new(format!("invalid scan cursor {c:?}")))?,
            None => 0,
        };
        let end = self
            .page_size
            .map_or(rows.len(), |size| (start + size).min(rows.len()));
        let items = rows
            .get(start..end)
            .unwrap_or(&[])
            .iter()
            .map(|(_, v)| v.clone())
            .collect();
        let next = (end < rows.len()).then(|| end.to_string());

        Ok(ScanPage { items, next })
    }
}

/// In-memory blob store.
#[derive(Debug, Default)]
pub struct MemoryBlobStore {
    objects: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, key: &str) -> Option<Vec<u8>> {
        self.objects.read().ok()?.get(key).cloned()
    }

    /// Keys of every stored object, sorted.
    pub fn keys(&self) -> Vec<String> {
        self.objects
            .read()
            .map(|objects| objects.keys().cloned().collect())
            .unwrap_or_default()
    }
}

impl BlobStore for MemoryBlobStore {
    fn upload(&self, key: &str, bytes: &[u8]) -> Result<(), StoreError> {
        self.objects
            .write()
            .map_err(|_| StoreError::new("blob store lock poisoned"))?
            .insert(key.to_string(), bytes.to_vec());
        Ok(())
    }
}
