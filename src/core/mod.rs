//! Domain records shared by ingestion, matching and reporting.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Number value used when the caller's number was not disclosed.
pub const WITHHELD: &str = "Withheld";

/// Operator name reported when no operator owns a number.
pub const UNKNOWN_OPERATOR: &str = "Unknown";

/// One incoming phone call with its risk metadata.
///
/// `risk_score` is only meaningful when neither list flag is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Call {
    pub id: String,
    pub date: String,
    pub number: String,
    pub risk_score: Decimal,
    pub green_list: bool,
    pub red_list: bool,
}

impl Call {
    /// Date portion of `date`: everything before the first `T`.
    pub fn date_only(&self) -> &str {
        self.date
            .split_once('T')
            .map_or(self.date.as_str(), |(day, _)| day)
    }

    pub fn is_withheld(&self) -> bool {
        self.number == WITHHELD
    }

    /// Store key: `(id, number)`, so repeated ids with different numbers
    /// are kept apart.
    pub fn record_key(&self) -> RecordKey {
        RecordKey::new(&self.id, &self.number)
    }
}

/// Maps a number prefix to a telecom operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    pub prefix: String,
    pub operator: String,
}

impl Operator {
    /// First character of the registered prefix, the significant match key.
    pub fn leading_char(&self) -> Option<char> {
        self.prefix.chars().next()
    }

    /// Store key: `(id, prefix)`.
    pub fn record_key(&self) -> RecordKey {
        RecordKey::new(&self.id, &self.prefix)
    }
}

/// Report-ready representation of one call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedRow {
    pub call_id: String,
    /// Date only (`YYYY-MM-DD`).
    pub date: String,
    pub number: String,
    pub operator: String,
    pub risk_score: Decimal,
}

impl MatchedRow {
    /// Fields in report column order.
    pub fn fields(&self) -> [String; 5] {
        [
            self.call_id.clone(),
            self.date.clone(),
            self.number.clone(),
            self.operator.clone(),
            self.risk_score.to_string(),
        ]
    }
}

/// Composite record store key: partition (`id`) plus sort component.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct RecordKey {
    pub partition: String,
    pub sort: String,
}

impl RecordKey {
    pub fn new(partition: impl Into<String>, sort: impl Into<String>) -> Self {
        Self {
            partition: partition.into(),
            sort: sort.into(),
        }
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.partition, self.sort)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn call(date: &str, number: &str) -> Call {
        Call {
            id: "c1".into(),
            date: date.into(),
            number: number.into(),
            risk_score: Decimal::new(37, 2),
            green_list: false,
            red_list: false,
        }
    }

    #[test]
    fn test_date_only_strips_time() {
        assert_eq!(call("2024-01-05T10:00:00", "1").date_only(), "2024-01-05");
    }

    #[test]
    fn test_date_only_without_time_is_whole_value() {
        assert_eq!(call("2024-01-05", "1").date_only(), "2024-01-05");
    }

    #[test]
    fn test_keys_are_composite() {
        let c = call("2024-01-05", "44201234567");
        assert_eq!(c.record_key().to_string(), "c1#44201234567");

        let op = Operator {
            id: "o1".into(),
            prefix: "2xx".into(),
            operator: "OperCo".into(),
        };
        assert_eq!(op.record_key(), RecordKey::new("o1", "2xx"));
        assert_eq!(op.leading_char(), Some('2'));
    }

    #[test]
    fn test_call_wire_format_is_camel_case_with_exact_score() {
        let value = serde_json::to_value(call("2024-01-05", WITHHELD)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": "c1",
                "date": "2024-01-05",
                "number": "Withheld",
                "riskScore": "0.37",
                "greenList": false,
                "redList": false,
            })
        );
        let back: Call = serde_json::from_value(value).unwrap();
        assert!(back.is_withheld());
        assert_eq!(back.risk_score, Decimal::new(37, 2));
    }
}
