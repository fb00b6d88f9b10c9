//! Field validators for submission items.
//!
//! Each validator checks one attribute and returns a [`FieldValidation`];
//! [`map_item`] runs all of an item's validators before deciding, so a
//! rejected item lists every offending field.

use std::str::FromStr;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde_json::{Map, Value};

use super::submission::SubmissionItem;
use super::Entity;
use crate::core::{Call, Operator, WITHHELD};
use crate::effects::{collect_field, field_failure, field_success, FieldValidation};
use crate::errors::MatchError;

pub const CALL_TYPE: &str = "call";
pub const OPERATOR_TYPE: &str = "operator";

type Attributes = Map<String, Value>;

/// Required string attribute. `null` counts as missing.
pub fn required_string(attrs: &Attributes, name: &str) -> FieldValidation<String> {
    match attrs.get(name) {
        None | Some(Value::Null) => field_failure(format!("missing field `{name}`")),
        Some(Value::String(s)) => field_success(s.clone()),
        Some(other) => field_failure(format!(
            "`{name}` must be a string (got {})",
            type_name(other)
        )),
    }
}

/// Required string attribute that must not be empty.
pub fn non_empty_string(attrs: &Attributes, name: &str) -> FieldValidation<String> {
    match required_string(attrs, name) {
        stillwater::Validation::Success(s) if s.is_empty() => {
            field_failure(format!("`{name}` must not be empty"))
        }
        other => other,
    }
}

pub fn required_bool(attrs: &Attributes, name: &str) -> FieldValidation<bool> {
    match attrs.get(name) {
        None | Some(Value::Null) => field_failure(format!("missing field `{name}`")),
        Some(Value::Bool(b)) => field_success(*b),
        Some(other) => field_failure(format!(
            "`{name}` must be a boolean (got {})",
            type_name(other)
        )),
    }
}

/// Exact decimal from a JSON number or a numeric string.
///
/// Numbers go through their shortest textual form, so `0.35` stays `0.35`
/// instead of picking up binary float noise.
pub fn required_decimal(attrs: &Attributes, name: &str) -> FieldValidation<Decimal> {
    let text = match attrs.get(name) {
        None | Some(Value::Null) => return field_failure(format!("missing field `{name}`")),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::String(s)) => s.trim().to_string(),
        Some(other) => {
            return field_failure(format!(
                "`{name}` must be a number (got {})",
                type_name(other)
            ))
        }
    };
    match parse_decimal(&text) {
        Some(value) => field_success(value),
        None => field_failure(format!("`{name}` is not a valid decimal: {text:?}")),
    }
}

fn parse_decimal(text: &str) -> Option<Decimal> {
    if text.contains(['e', 'E']) {
        Decimal::from_scientific(text).ok()
    } else {
        Decimal::from_str_exact(text)
            .or_else(|_| Decimal::from_str(text))
            .ok()
    }
}

/// ISO-8601 timestamp whose date part is a real calendar date.
pub fn iso_date(attrs: &Attributes, name: &str) -> FieldValidation<String> {
    match required_string(attrs, name) {
        stillwater::Validation::Success(date) => {
            let day = date.split_once('T').map_or(date.as_str(), |(day, _)| day);
            if NaiveDate::parse_from_str(day, "%Y-%m-%d").is_ok() {
                field_success(date)
            } else {
                field_failure(format!(
                    "`{name}` must start with a YYYY-MM-DD date (got {date:?})"
                ))
            }
        }
        failure => failure,
    }
}

/// Caller number; absent or `null` means the number was withheld.
pub fn number_or_withheld(attrs: &Attributes) -> FieldValidation<String> {
    match attrs.get("number") {
        None | Some(Value::Null) => field_success(WITHHELD.to_string()),
        Some(Value::String(s)) => field_success(s.clone()),
        Some(other) => field_failure(format!(
            "`number` must be a string (got {})",
            type_name(other)
        )),
    }
}

fn item_id(item: &SubmissionItem) -> FieldValidation<String> {
    match item.id() {
        None | Some(Value::Null) => field_failure("missing field `id`"),
        Some(Value::String(s)) if s.is_empty() => field_failure("`id` must not be empty"),
        Some(Value::String(s)) => field_success(s.clone()),
        Some(other) => field_failure(format!("`id` must be a string (got {})", type_name(other))),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Map one submission item to an entity.
///
/// An item that is not a JSON object is rejected outright. A present `type`
/// other than `"call"` or `"operator"`, string or not, is an unsupported
/// discriminant and is reported before any field is looked at. Otherwise
/// every field problem of the item is collected into one validation error.
pub fn map_item(index: usize, item: &SubmissionItem) -> Result<Entity, MatchError> {
    if item.fields().is_none() {
        return Err(MatchError::invalid_item(
            index,
            None,
            vec![format!(
                "item must be an object (got {})",
                type_name(item.as_value())
            )],
        ));
    }

    let kind = match item.item_type() {
        Some(Value::String(s)) if s == CALL_TYPE => CALL_TYPE,
        Some(Value::String(s)) if s == OPERATOR_TYPE => OPERATOR_TYPE,
        Some(Value::String(other)) => {
            return Err(MatchError::unsupported_type(index, other.as_str()))
        }
        None | Some(Value::Null) => {
            return Err(MatchError::invalid_item(
                index,
                item.id_hint(),
                vec!["missing field `type`".to_string()],
            ))
        }
        Some(other) => return Err(MatchError::unsupported_type(index, other.to_string())),
    };

    let empty = Attributes::new();
    let mut problems = Vec::new();
    let attrs = match item.attributes() {
        Some(Value::Object(attrs)) => attrs,
        None | Some(Value::Null) => {
            problems.push("missing field `attributes`".to_string());
            &empty
        }
        Some(other) => {
            problems.push(format!(
                "`attributes` must be an object (got {})",
                type_name(other)
            ));
            &empty
        }
    };

    let id = collect_field(item_id(item), &mut problems);
    let entity = if kind == CALL_TYPE {
        map_call(id, attrs, &mut problems)
    } else {
        map_operator(id, attrs, &mut problems)
    };

    match entity {
        Some(entity) if problems.is_empty() => Ok(entity),
        _ => Err(MatchError::invalid_item(index, item.id_hint(), problems)),
    }
}

fn map_call(id: Option<String>, attrs: &Attributes, problems: &mut Vec<String>) -> Option<Entity> {
    let date = collect_field(iso_date(attrs, "date"), problems);
    let number = collect_field(number_or_withheld(attrs), problems);
    let risk_score = collect_field(required_decimal(attrs, "riskScore"), problems);
    let green_list = collect_field(required_bool(attrs, "greenList"), problems);
    let red_list = collect_field(required_bool(attrs, "redList"), problems);

    Some(Entity::Call(Call {
        id: id?,
        date: date?,
        number: number?,
        risk_score: risk_score?,
        green_list: green_list?,
        red_list: red_list?,
    }))
}

fn map_operator(
    id: Option<String>,
    attrs: &Attributes,
    problems: &mut Vec<String>,
) -> Option<Entity> {
    let prefix = collect_field(non_empty_string(attrs, "prefix"), problems);
    let operator = collect_field(required_string(attrs, "operator"), problems);

    Some(Entity::Operator(Operator {
        id: id?,
        prefix: prefix?,
        operator: operator?,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn item(value: Value) -> SubmissionItem {
        SubmissionItem::new(value)
    }

    fn attrs(value: Value) -> Attributes {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected object"),
        }
    }

    #[test]
    fn test_maps_complete_call() {
        let entity = map_item(
            0,
            &item(json!({
                "type": "call",
                "id": "c1",
                "attributes": {
                    "date": "2024-01-05T10:00:00",
                    "number": "44201234567",
                    "riskScore": 0.37,
                    "greenList": false,
                    "redList": false
                }
            })),
        )
        .unwrap();

        assert_eq!(
            entity,
            Entity::Call(Call {
                id: "c1".into(),
                date: "2024-01-05T10:00:00".into(),
                number: "44201234567".into(),
                risk_score: Decimal::new(37, 2),
                green_list: false,
                red_list: false,
            })
        );
    }

    #[test]
    fn test_absent_or_null_number_is_withheld() {
        for attrs in [
            json!({"date": "2024-01-05", "riskScore": 0.1, "greenList": true, "redList": false}),
            json!({"date": "2024-01-05", "number": null, "riskScore": 0.1, "greenList": true, "redList": false}),
        ] {
            let entity = map_item(0, &item(json!({"type": "call", "id": "c2", "attributes": attrs}))).unwrap();
            match entity {
                Entity::Call(call) => assert_eq!(call.number, WITHHELD),
                other => panic!("expected call, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_all_field_problems_are_reported_together() {
        let err = map_item(
            3,
            &item(json!({
                "type": "call",
                "id": "c9",
                "attributes": {"date": "yesterday", "riskScore": "high", "greenList": "no"}
            })),
        )
        .unwrap_err();

        match err {
            MatchError::Validation { item, id, problems } => {
                assert_eq!(item, Some(3));
                assert_eq!(id.as_deref(), Some("c9"));
                assert_eq!(
                    problems,
                    vec![
                        "`date` must start with a YYYY-MM-DD date (got \"yesterday\")",
                        "`riskScore` is not a valid decimal: \"high\"",
                        "`greenList` must be a boolean (got string)",
                        "missing field `redList`",
                    ]
                );
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_unknown_type_wins_over_field_problems() {
        let err = map_item(1, &item(json!({"type": "fax", "id": "f1"}))).unwrap_err();
        assert_eq!(err, MatchError::unsupported_type(1, "fax"));
    }

    #[test]
    fn test_non_string_type_is_unsupported() {
        let err =
            map_item(1, &item(json!({"type": 5, "id": "x", "attributes": {}}))).unwrap_err();
        assert_eq!(err, MatchError::unsupported_type(1, "5"));
        assert_eq!(err.details()["item"], 1);

        let err = map_item(2, &item(json!({"type": ["call"], "id": "x"}))).unwrap_err();
        assert_eq!(err.kind(), "UnsupportedTypeError");
        assert_eq!(err.details()["item"], 2);
    }

    #[test]
    fn test_non_object_attributes_are_reported_on_the_item() {
        let err = map_item(
            4,
            &item(json!({"type": "operator", "id": "o1", "attributes": "oops"})),
        )
        .unwrap_err();
        match err {
            MatchError::Validation { item, id, problems } => {
                assert_eq!(item, Some(4));
                assert_eq!(id.as_deref(), Some("o1"));
                assert_eq!(problems[0], "`attributes` must be an object (got string)");
                assert!(problems.contains(&"missing field `prefix`".to_string()));
            }
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_non_object_item_is_reported_with_its_index() {
        let err = map_item(2, &item(json!(7))).unwrap_err();
        assert_eq!(
            err,
            MatchError::invalid_item(2, None, vec!["item must be an object (got number)".into()])
        );
    }

    #[test]
    fn test_missing_type_is_validation_error() {
        let err = map_item(0, &item(json!({"id": "x"}))).unwrap_err();
        assert_eq!(err.kind(), "ValidationError");
        assert!(err.to_string().contains("missing field `type`"));
    }

    #[test]
    fn test_operator_requires_non_empty_prefix() {
        let err = map_item(
            0,
            &item(json!({"type": "operator", "id": "o1", "attributes": {"prefix": "", "operator": "OperCo"}})),
        )
        .unwrap_err();
        assert!(err.to_string().contains("`prefix` must not be empty"));
    }

    #[test]
    fn test_missing_attributes_and_id() {
        let err = map_item(0, &item(json!({"type": "operator"}))).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("missing field `attributes`"));
        assert!(message.contains("missing field `id`"));
        assert!(message.contains("missing field `prefix`"));
    }

    #[test]
    fn test_decimal_from_number_and_string_is_exact() {
        let a = attrs(json!({"n": 0.35, "s": "0.25", "e": 1e-7, "i": 1}));
        assert_eq!(
            crate::effects::into_problems(required_decimal(&a, "n")),
            Ok(Decimal::new(35, 2))
        );
        assert_eq!(
            crate::effects::into_problems(required_decimal(&a, "s")),
            Ok(Decimal::new(25, 2))
        );
        assert_eq!(
            crate::effects::into_problems(required_decimal(&a, "e")),
            Ok(Decimal::new(1, 7))
        );
        assert_eq!(
            crate::effects::into_problems(required_decimal(&a, "i")),
            Ok(Decimal::ONE)
        );
    }

    #[test]
    fn test_iso_date_rejects_impossible_day() {
        let a = attrs(json!({"date": "2024-02-30T00:00:00"}));
        assert!(iso_date(&a, "date").is_failure());
        let a = attrs(json!({"date": "2024-02-29T00:00:00Z"}));
        assert!(iso_date(&a, "date").is_success());
    }
}
