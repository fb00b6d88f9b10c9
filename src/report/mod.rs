//! Report generation: sort, join, classify, serialize, publish.

pub mod csv;

pub use self::csv::{parse_rows, to_csv, write_rows};

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::ReportConfig;
use crate::core::{Call, MatchedRow};
use crate::errors::MatchError;
use crate::matcher::Matcher;
use crate::risk;
use crate::store::BlobStore;

/// Timestamp format substituted into the report key.
pub const KEY_TIMESTAMP_FORMAT: &str = "%Y%m%dT%H%M%SZ";

/// A published report.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub key: String,
    pub generated_at: DateTime<Utc>,
    pub rows: Vec<MatchedRow>,
}

/// Stable sort by date portion, ascending. Ties keep input order.
pub fn sort_calls(calls: &mut [Call]) {
    calls.sort_by(|a, b| a.date_only().cmp(b.date_only()));
}

/// Join and classify `calls`, in the order given.
///
/// A call that cannot be matched does not stop the remaining calls: the
/// first such error is returned carrying every row that could be built.
pub fn build_rows(calls: &[Call], matcher: &Matcher<'_>) -> Result<Vec<MatchedRow>, MatchError> {
    let mut rows = Vec::with_capacity(calls.len());
    let mut first_error = None;

    for call in calls {
        match build_row(call, matcher) {
            Ok(row) => rows.push(row),
            Err(err) => {
                tracing::warn!(call = ?call, error = %err, "Could not match call");
                first_error.get_or_insert(err);
            }
        }
    }

    match first_error {
        Some(err) => Err(err.with_rows(rows)),
        None => Ok(rows),
    }
}

fn build_row(call: &Call, matcher: &Matcher<'_>) -> Result<MatchedRow, MatchError> {
    let operator = matcher.operator_for(call)?;
    let assessment = risk::assess(call);
    tracing::debug!(
        call_id = %call.id,
        operator,
        score = %assessment.score,
        basis = ?assessment.basis,
        "Matched call"
    );
    Ok(MatchedRow {
        call_id: call.id.clone(),
        date: call.date_only().to_string(),
        number: call.number.clone(),
        operator: operator.to_string(),
        risk_score: assessment.score,
    })
}

/// Object key for a run at `now`.
pub fn report_key(template: &str, now: DateTime<Utc>) -> String {
    let key = template.trim_start_matches('/');
    if key.contains(ReportConfig::TIMESTAMP_PLACEHOLDER) {
        key.replace(
            ReportConfig::TIMESTAMP_PLACEHOLDER,
            &now.format(KEY_TIMESTAMP_FORMAT).to_string(),
        )
    } else {
        key.to_string()
    }
}

/// Sort, match and classify `calls`, then upload the serialized report.
///
/// Nothing is uploaded unless the whole report serialized. Serialization
/// and upload errors carry the computed rows.
pub fn generate_report(
    mut calls: Vec<Call>,
    matcher: &Matcher<'_>,
    blobs: &dyn BlobStore,
    config: &ReportConfig,
    now: DateTime<Utc>,
) -> Result<Report, MatchError> {
    let _span = tracing::info_span!("report", calls = calls.len()).entered();

    sort_calls(&mut calls);
    let rows = build_rows(&calls, matcher).inspect_err(log_failure)?;
    publish(rows, blobs, config, now)
}

/// Serialize `rows` and upload them under the configured key.
pub fn publish(
    rows: Vec<MatchedRow>,
    blobs: &dyn BlobStore,
    config: &ReportConfig,
    now: DateTime<Utc>,
) -> Result<Report, MatchError> {
    let bytes = to_csv(&rows).inspect_err(log_failure)?;
    let key = report_key(&config.key, now);

    if let Err(e) = blobs.upload(&key, &bytes) {
        let err = MatchError::Upload {
            key,
            message: e.to_string(),
            rows,
        };
        log_failure(&err);
        return Err(err);
    }

    tracing::info!(key = %key, rows = rows.len(), bytes = bytes.len(), "Uploaded report");
    Ok(Report {
        key,
        generated_at: now,
        rows,
    })
}

fn log_failure(err: &MatchError) {
    let rows = serde_json::to_string(err.computed_rows()).unwrap_or_default();
    tracing::error!(error = %err, %rows, "Report generation failed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Operator;
    use crate::matcher::{FixedOffsetExtractor, MatchStrategy};
    use crate::store::MemoryBlobStore;
    use crate::testkit::{call, operator, FailingBlobStore};
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;
    use rust_decimal::Decimal;

    fn run_at() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 6, 12, 30, 5).unwrap()
    }

    fn operators() -> Vec<Operator> {
        vec![operator("o1", "2xx", "OperCo"), operator("o2", "3", "Tel3")]
    }

    #[test]
    fn test_sort_is_stable_on_date_only() {
        let mut calls = vec![
            call("b", "2024-01-05T23:00:00", "1112"),
            call("a", "2024-01-04T10:00:00", "1113"),
            call("c", "2024-01-05T01:00:00", "1112"),
        ];
        sort_calls(&mut calls);
        let ids: Vec<_> = calls.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_report_key_template() {
        assert_eq!(
            report_key("reports/{timestamp}.csv", run_at()),
            "reports/20240106T123005Z.csv"
        );
        assert_eq!(report_key("/tmp/output.csv", run_at()), "tmp/output.csv");
    }

    #[test]
    fn test_generate_uploads_sorted_rows() {
        let ops = operators();
        let extractor = FixedOffsetExtractor::default();
        let matcher = Matcher::new(&ops, &extractor, MatchStrategy::Indexed);
        let blobs = MemoryBlobStore::new();
        let calls = vec![
            call("late", "2024-01-07T00:00:00", "4413000"),
            call("early", "2024-01-02T00:00:00", "4412000"),
        ];

        let report =
            generate_report(calls, &matcher, &blobs, &ReportConfig::default(), run_at()).unwrap();

        assert_eq!(report.key, "reports/20240106T123005Z.csv");
        let uploaded = blobs.get(&report.key).unwrap();
        assert_eq!(
            String::from_utf8(uploaded).unwrap(),
            "early,2024-01-02,4412000,OperCo,0.4\r\nlate,2024-01-07,4413000,Tel3,0.4\r\n"
        );
    }

    #[test]
    fn test_short_number_aborts_without_upload() {
        let ops = operators();
        let extractor = FixedOffsetExtractor::default();
        let matcher = Matcher::new(&ops, &extractor, MatchStrategy::Linear);
        let blobs = MemoryBlobStore::new();

        let err = generate_report(
            vec![call("c1", "2024-01-02", "441")],
            &matcher,
            &blobs,
            &ReportConfig::default(),
            run_at(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), "InvalidNumberFormatError");
        assert!(blobs.keys().is_empty());
    }

    #[test]
    fn test_match_failure_carries_rows_of_other_calls() {
        let ops = operators();
        let extractor = FixedOffsetExtractor::default();
        let matcher = Matcher::new(&ops, &extractor, MatchStrategy::Indexed);
        let blobs = MemoryBlobStore::new();
        let calls = vec![
            call("ok1", "2024-01-01", "4412000"),
            call("short", "2024-01-02", "44"),
            call("ok2", "2024-01-03", "4413000"),
        ];

        let err = generate_report(calls, &matcher, &blobs, &ReportConfig::default(), run_at())
            .unwrap_err();

        let ids: Vec<_> = err
            .computed_rows()
            .iter()
            .map(|row| row.call_id.as_str())
            .collect();
        assert_eq!(ids, vec!["ok1", "ok2"]);
        assert_eq!(err.details()["callId"], "short");
        assert_eq!(err.details()["rows"][1]["operator"], "Tel3");
        assert!(blobs.keys().is_empty());
    }

    #[test]
    fn test_upload_failure_carries_rows() {
        let rows = vec![MatchedRow {
            call_id: "c1".into(),
            date: "2024-01-05".into(),
            number: "Withheld".into(),
            operator: "Unknown".into(),
            risk_score: Decimal::new(10, 1),
        }];

        let err = publish(
            rows.clone(),
            &FailingBlobStore,
            &ReportConfig::default(),
            run_at(),
        )
        .unwrap_err();

        assert_eq!(err.kind(), "UploadError");
        assert_eq!(err.computed_rows(), rows.as_slice());
    }
}
