use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::matcher::{FixedOffsetExtractor, MatchStrategy};

/// Root configuration structure for callmatch
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default, deny_unknown_fields)]
pub struct CallmatchConfig {
    /// Where the filesystem stores keep their data
    pub storage: StorageConfig,

    /// Record store table names
    pub tables: TablesConfig,

    /// Report destination and key
    pub report: ReportConfig,

    /// Operator matching behaviour
    pub matcher: MatcherConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from(".callmatch"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct TablesConfig {
    pub calls: String,
    pub operators: String,
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            calls: "infra-smartnumbers-calls".to_string(),
            operators: "infra-smartnumbers-operators".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    pub bucket: String,

    /// Object key template; `{timestamp}` is replaced by the run time.
    pub key: String,
}

impl ReportConfig {
    pub const TIMESTAMP_PLACEHOLDER: &'static str = "{timestamp}";
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            bucket: "infra-smartnumbers-output-bucket".to_string(),
            key: "reports/{timestamp}.csv".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct MatcherConfig {
    /// Character offset of the operator digit in a call number
    pub prefix_offset: usize,
    pub strategy: MatchStrategy,
}

impl MatcherConfig {
    pub fn extractor(&self) -> FixedOffsetExtractor {
        FixedOffsetExtractor::new(self.prefix_offset)
    }
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            prefix_offset: FixedOffsetExtractor::DEFAULT_OFFSET,
            strategy: MatchStrategy::default(),
        }
    }
}
