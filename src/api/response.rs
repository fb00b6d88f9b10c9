use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::MatchError;

pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Gateway-style response: status, headers and a JSON body as text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse {
    pub status_code: u16,
    pub headers: BTreeMap<String, String>,
    pub body: String,
}

impl ApiResponse {
    pub fn new(status_code: u16, body: &Value) -> Self {
        let mut headers = BTreeMap::new();
        headers.insert("Content-Type".to_string(), CONTENT_TYPE_JSON.to_string());
        Self {
            status_code,
            headers,
            body: body.to_string(),
        }
    }

    pub fn ok(body: &Value) -> Self {
        Self::new(200, body)
    }

    pub fn from_error(err: &MatchError) -> Self {
        let body = serde_json::to_value(err.to_body()).unwrap_or_else(|_| {
            serde_json::json!({ "kind": err.kind(), "message": err.to_string() })
        });
        Self::new(err.status_code(), &body)
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status_code)
    }

    pub fn json_body(&self) -> Result<Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}
