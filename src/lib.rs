// Export modules for library usage
pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod core;
pub mod effects;
pub mod env;
pub mod errors;
pub mod ingest;
pub mod matcher;
pub mod observability;
pub mod pipeline;
pub mod report;
pub mod risk;
pub mod store;
pub mod testkit;

// Re-export commonly used types
pub use crate::core::{Call, MatchedRow, Operator, RecordKey, UNKNOWN_OPERATOR, WITHHELD};

pub use crate::errors::{ErrorBody, ErrorCode, MatchError};

pub use crate::env::{Clock, MatchEnv};

pub use crate::ingest::{ingest_batch, IngestSummary, SubmissionBatch};

pub use crate::matcher::{FixedOffsetExtractor, MatchStrategy, Matcher, PrefixExtractor};

pub use crate::pipeline::{run_ingest, run_match};

pub use crate::report::{generate_report, Report};

pub use crate::store::{BlobStore, RecordStore};
