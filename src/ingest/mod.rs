//! Submission ingestion.
//!
//! A batch is validated in full before anything is written: the first
//! invalid item aborts the batch and the store is left untouched. A valid
//! batch is then upserted one item at a time, in batch order. If the store
//! fails part way, the error reports how many items were already committed.

pub mod submission;
pub mod validate;

pub use submission::{SubmissionBatch, SubmissionItem};
pub use validate::map_item;

use serde::Serialize;
use serde_json::Value;

use crate::config::TablesConfig;
use crate::core::{Call, Operator, RecordKey};
use crate::errors::MatchError;
use crate::store::RecordStore;

/// A validated submission item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Entity {
    Call(Call),
    Operator(Operator),
}

impl Entity {
    pub fn table<'a>(&self, tables: &'a TablesConfig) -> &'a str {
        match self {
            Entity::Call(_) => &tables.calls,
            Entity::Operator(_) => &tables.operators,
        }
    }

    pub fn record_key(&self) -> RecordKey {
        match self {
            Entity::Call(call) => call.record_key(),
            Entity::Operator(operator) => operator.record_key(),
        }
    }

    /// Stored representation.
    pub fn to_record(&self) -> Result<Value, serde_json::Error> {
        match self {
            Entity::Call(call) => serde_json::to_value(call),
            Entity::Operator(operator) => serde_json::to_value(operator),
        }
    }
}

/// Counts of items written by one batch.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub calls: usize,
    pub operators: usize,
}

impl IngestSummary {
    pub fn total(&self) -> usize {
        self.calls + self.operators
    }
}

/// Validate every item of `batch`, stopping at the first invalid one.
pub fn validate_batch(batch: &SubmissionBatch) -> Result<Vec<Entity>, MatchError> {
    batch
        .data
        .iter()
        .enumerate()
        .map(|(index, item)| {
            map_item(index, item).inspect_err(|err| {
                let record = serde_json::to_string(item).unwrap_or_default();
                tracing::warn!(item = index, %record, error = %err, "Rejected submission item");
            })
        })
        .collect()
}

/// Validate and persist a batch.
pub fn ingest_batch(
    store: &dyn RecordStore,
    tables: &TablesConfig,
    batch: &SubmissionBatch,
) -> Result<IngestSummary, MatchError> {
    let _span = tracing::info_span!("ingest", items = batch.len()).entered();

    let entities = validate_batch(batch)?;
    let summary = write_entities(store, tables, &entities)?;

    tracing::info!(
        calls = summary.calls,
        operators = summary.operators,
        "Ingested batch"
    );
    Ok(summary)
}

fn write_entities(
    store: &dyn RecordStore,
    tables: &TablesConfig,
    entities: &[Entity],
) -> Result<IngestSummary, MatchError> {
    let mut summary = IngestSummary::default();

    for (committed, entity) in entities.iter().enumerate() {
        let table = entity.table(tables);
        let key = entity.record_key();
        let write_error = |message: String| MatchError::StoreWrite {
            table: table.to_string(),
            key: key.to_string(),
            message,
            committed,
        };

        let record = entity.to_record().map_err(|e| write_error(e.to_string()))?;
        if let Err(e) = store.put(table, &key, record.clone()) {
            let err = write_error(e.to_string());
            tracing::error!(%record, committed, error = %err, "Store write failed");
            return Err(err);
        }
        tracing::debug!(table, key = %key, "Upserted record");

        match entity {
            Entity::Call(_) => summary.calls += 1,
            Entity::Operator(_) => summary.operators += 1,
        }
    }

    Ok(summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryRecordStore;
    use crate::testkit::FailingRecordStore;
    use indoc::indoc;

    fn batch(body: &str) -> SubmissionBatch {
        SubmissionBatch::from_json(body).unwrap()
    }

    const MIXED: &str = indoc! {r#"
        {"data": [
            {"type": "call", "id": "c1", "attributes": {
                "date": "2024-01-05T10:00:00", "number": "44201234567",
                "riskScore": 0.37, "greenList": false, "redList": false}},
            {"type": "operator", "id": "o1", "attributes": {"prefix": "2xx", "operator": "OperCo"}}
        ]}
    "#};

    #[test]
    fn test_writes_each_entity_to_its_table() {
        let store = MemoryRecordStore::new();
        let tables = TablesConfig::default();

        let summary = ingest_batch(&store, &tables, &batch(MIXED)).unwrap();

        assert_eq!(summary, IngestSummary { calls: 1, operators: 1 });
        assert_eq!(store.len(&tables.calls), 1);
        assert_eq!(store.len(&tables.operators), 1);
        let stored = store
            .get(&tables.calls, &RecordKey::new("c1", "44201234567"))
            .unwrap();
        assert_eq!(stored["riskScore"], "0.37");
    }

    #[test]
    fn test_unsupported_type_writes_nothing() {
        let store = MemoryRecordStore::new();
        let tables = TablesConfig::default();
        let body = indoc! {r#"
            {"data": [
                {"type": "call", "id": "c1", "attributes": {
                    "date": "2024-01-05", "riskScore": 0.1, "greenList": false, "redList": false}},
                {"type": "fax", "id": "f1", "attributes": {}}
            ]}
        "#};

        let err = ingest_batch(&store, &tables, &batch(body)).unwrap_err();

        assert_eq!(err, MatchError::unsupported_type(1, "fax"));
        assert!(store.is_empty(&tables.calls));
    }

    #[test]
    fn test_reingesting_is_idempotent() {
        let store = MemoryRecordStore::new();
        let tables = TablesConfig::default();
        ingest_batch(&store, &tables, &batch(MIXED)).unwrap();
        ingest_batch(&store, &tables, &batch(MIXED)).unwrap();
        assert_eq!(store.len(&tables.calls), 1);
        assert_eq!(store.len(&tables.operators), 1);
    }

    #[test]
    fn test_store_failure_reports_committed_count() {
        let store = FailingRecordStore::failing_after(1);
        let tables = TablesConfig::default();

        let err = ingest_batch(&store, &tables, &batch(MIXED)).unwrap_err();

        match err {
            MatchError::StoreWrite {
                table,
                key,
                committed,
                ..
            } => {
                assert_eq!(table, tables.operators);
                assert_eq!(key, "o1#2xx");
                assert_eq!(committed, 1);
            }
            other => panic!("expected store write error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_batch_is_accepted() {
        let store = MemoryRecordStore::new();
        let summary =
            ingest_batch(&store, &TablesConfig::default(), &batch(r#"{"data": []}"#)).unwrap();
        assert_eq!(summary.total(), 0);
    }
}
