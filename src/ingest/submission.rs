//! Wire shape of an ingestion request.
//!
//! ```json
//! {"data": [{"type": "call", "id": "c1", "attributes": {"date": "..."}}]}
//! ```
//!
//! Items are kept as the JSON they arrived as. `validate` turns them into
//! entities and reports every problem it finds against the item's position,
//! and the ingest route echoes them back unchanged, unknown keys included.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::errors::MatchError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmissionBatch {
    pub data: Vec<SubmissionItem>,
    /// Top-level keys other than `data`, kept for the echo.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One entry of `data`, whatever its JSON shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SubmissionItem(Value);

impl SubmissionBatch {
    /// Parse a request body.
    ///
    /// Only the envelope is checked here: the body must be an object with a
    /// `data` array. Item contents are left to validation.
    pub fn from_json(body: &str) -> Result<Self, MatchError> {
        serde_json::from_str(body)
            .map_err(|e| MatchError::validation(format!("request body is not a valid batch: {e}")))
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl SubmissionItem {
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    pub fn as_value(&self) -> &Value {
        &self.0
    }

    /// The item as an object, or `None` for any other JSON value.
    pub fn fields(&self) -> Option<&Map<String, Value>> {
        self.0.as_object()
    }

    /// Raw `type` discriminant.
    pub fn item_type(&self) -> Option<&Value> {
        self.field("type")
    }

    pub fn id(&self) -> Option<&Value> {
        self.field("id")
    }

    /// Raw `attributes` value, which may not be an object.
    pub fn attributes(&self) -> Option<&Value> {
        self.field("attributes")
    }

    /// The item id when it is a string, for error context.
    pub fn id_hint(&self) -> Option<String> {
        self.id().and_then(Value::as_str).map(str::to_string)
    }

    pub fn attribute(&self, name: &str) -> Option<&Value> {
        self.attributes()
            .and_then(Value::as_object)
            .and_then(|attrs| attrs.get(name))
    }

    fn field(&self, name: &str) -> Option<&Value> {
        self.fields().and_then(|fields| fields.get(name))
    }
}

impl From<Value> for SubmissionItem {
    fn from(value: Value) -> Self {
        Self(value)
    }
}
