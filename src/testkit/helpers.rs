//! Fixture builders for calls, operators and submission bodies.

use rust_decimal::Decimal;
use serde_json::{json, Value};

use crate::core::{Call, Operator};

/// Unlisted call with a raw score of `0.37`.
pub fn call(id: &str, date: &str, number: &str) -> Call {
    Call {
        id: id.to_string(),
        date: date.to_string(),
        number: number.to_string(),
        risk_score: Decimal::new(37, 2),
        green_list: false,
        red_list: false,
    }
}

pub fn operator(id: &str, prefix: &str, name: &str) -> Operator {
    Operator {
        id: id.to_string(),
        prefix: prefix.to_string(),
        operator: name.to_string(),
    }
}

/// Builder for calls that need non-default list flags or scores.
#[derive(Debug, Clone)]
pub struct CallBuilder {
    call: Call,
}

impl CallBuilder {
    pub fn new(id: &str) -> Self {
        Self {
            call: call(id, "2024-01-05T10:00:00", "44201234567"),
        }
    }

    pub fn date(mut self, date: &str) -> Self {
        self.call.date = date.to_string();
        self
    }

    pub fn number(mut self, number: &str) -> Self {
        self.call.number = number.to_string();
        self
    }

    pub fn risk_score(mut self, score: Decimal) -> Self {
        self.call.risk_score = score;
        self
    }

    pub fn green_list(mut self, flag: bool) -> Self {
        self.call.green_list = flag;
        self
    }

    pub fn red_list(mut self, flag: bool) -> Self {
        self.call.red_list = flag;
        self
    }

    pub fn build(self) -> Call {
        self.call
    }
}

/// Submission item for `call` in wire shape.
pub fn call_item(call: &Call) -> Value {
    json!({
        "type": "call",
        "id": call.id,
        "attributes": {
            "date": call.date,
            "number": call.number,
            "riskScore": call.risk_score.to_string(),
            "greenList": call.green_list,
            "redList": call.red_list,
        }
    })
}

/// Submission item for `operator` in wire shape.
pub fn operator_item(operator: &Operator) -> Value {
    json!({
        "type": "operator",
        "id": operator.id,
        "attributes": {
            "prefix": operator.prefix,
            "operator": operator.operator,
        }
    })
}

/// `{"data": [...]}` request body.
pub fn batch_body(items: Vec<Value>) -> String {
    json!({ "data": items }).to_string()
}
