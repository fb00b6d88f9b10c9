//! End-to-end runs over a [`MatchEnv`].

use serde::de::DeserializeOwned;

use crate::core::{Call, Operator};
use crate::env::MatchEnv;
use crate::errors::MatchError;
use crate::ingest::{self, IngestSummary, SubmissionBatch};
use crate::matcher::Matcher;
use crate::report::{self, Report};
use crate::store::RecordStore;

/// Scan `table` in full and decode every record.
pub fn load_table<T: DeserializeOwned>(
    store: &dyn RecordStore,
    table: &str,
) -> Result<Vec<T>, MatchError> {
    let read_error = |message: String| MatchError::StoreRead {
        table: table.to_string(),
        message,
    };

    let items = store.scan(table).map_err(|e| read_error(e.to_string()))?;
    items
        .into_iter()
        .enumerate()
        .map(|(position, item)| {
            serde_json::from_value(item.clone()).map_err(|e| {
                tracing::error!(table, position, record = %item, error = %e, "Undecodable record");
                read_error(format!("record {position} is malformed: {e}"))
            })
        })
        .collect()
}

/// Validate and store a submission batch.
pub fn run_ingest(env: &MatchEnv, batch: &SubmissionBatch) -> Result<IngestSummary, MatchError> {
    ingest::ingest_batch(env.records(), &env.config().tables, batch)
}

/// Load both tables, match every call and publish the report.
pub fn run_match(env: &MatchEnv) -> Result<Report, MatchError> {
    let config = env.config();
    let calls: Vec<Call> = load_table(env.records(), &config.tables.calls)?;
    let operators: Vec<Operator> = load_table(env.records(), &config.tables.operators)?;
    tracing::info!(
        calls = calls.len(),
        operators = operators.len(),
        "Loaded snapshot"
    );

    let extractor = config.matcher.extractor();
    let matcher = Matcher::new(&operators, &extractor, config.matcher.strategy);
    report::generate_report(calls, &matcher, env.blobs(), &config.report, env.now())
}
