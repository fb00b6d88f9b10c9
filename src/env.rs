//! Run environment: the stores, configuration and clock a request needs.
//!
//! The core takes its collaborators as parameters. `MatchEnv` bundles them
//! so entry points can be handed one value, and tests can swap in
//! in-memory stores and a fixed clock.
//!
//! ```rust
//! use std::sync::Arc;
//! use callmatch::config::CallmatchConfig;
//! use callmatch::env::MatchEnv;
//! use callmatch::store::{MemoryBlobStore, MemoryRecordStore};
//!
//! let env = MatchEnv::new(
//!     CallmatchConfig::default(),
//!     Arc::new(MemoryRecordStore::new()),
//!     Arc::new(MemoryBlobStore::new()),
//! );
//! assert_eq!(env.config().tables.calls, "infra-smartnumbers-calls");
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::CallmatchConfig;
use crate::store::{BlobStore, FsBlobStore, FsRecordStore, RecordStore};

/// Source of the run timestamp.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Clock {
    #[default]
    System,
    Fixed(DateTime<Utc>),
}

impl Clock {
    pub fn now(&self) -> DateTime<Utc> {
        match self {
            Clock::System => Utc::now(),
            Clock::Fixed(at) => *at,
        }
    }
}

#[derive(Clone)]
pub struct MatchEnv {
    records: Arc<dyn RecordStore>,
    blobs: Arc<dyn BlobStore>,
    config: CallmatchConfig,
    clock: Clock,
}

impl MatchEnv {
    pub fn new(
        config: CallmatchConfig,
        records: Arc<dyn RecordStore>,
        blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            records,
            blobs,
            config,
            clock: Clock::System,
        }
    }

    /// Environment backed by the configured data directory.
    pub fn on_disk(config: CallmatchConfig) -> Self {
        let data_dir = &config.storage.data_dir;
        let records = Arc::new(FsRecordStore::new(data_dir.clone()));
        let blobs = Arc::new(FsBlobStore::new(data_dir, &config.report.bucket));
        Self::new(config, records, blobs)
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    pub fn records(&self) -> &dyn RecordStore {
        self.records.as_ref()
    }

    pub fn blobs(&self) -> &dyn BlobStore {
        self.blobs.as_ref()
    }

    pub fn config(&self) -> &CallmatchConfig {
        &self.config
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }
}

impl std::fmt::Debug for MatchEnv {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MatchEnv")
            .field("config", &self.config)
            .field("clock", &self.clock)
            .finish_non_exhaustive()
    }
}
