//! Request boundary: gateway envelopes in, JSON responses out.
//!
//! Two routes exist. `ingest` accepts a submission batch and echoes it back
//! once stored; `trigger` accepts `{"event": "New match trigger."}` and runs
//! the report. Only `POST` is routed. Every failure becomes a response
//! carrying the structured error body; nothing here panics.

mod response;

pub use response::{ApiResponse, CONTENT_TYPE_JSON};

use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::env::MatchEnv;
use crate::errors::MatchError;
use crate::ingest::SubmissionBatch;
use crate::pipeline;

/// The only event the trigger route accepts.
pub const MATCH_TRIGGER_EVENT: &str = "New match trigger.";

/// The only method the boundary routes.
pub const ACCEPTED_METHOD: &str = "POST";

/// API-gateway style request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayRequest {
    pub http_method: String,
    /// JSON document encoded as a string.
    #[serde(default)]
    pub body: Option<String>,
}

impl GatewayRequest {
    pub fn post(body: impl Into<String>) -> Self {
        Self {
            http_method: ACCEPTED_METHOD.to_string(),
            body: Some(body.into()),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Ingest,
    Trigger,
}

#[derive(Debug, Deserialize)]
struct TriggerRequest {
    #[serde(default)]
    event: Option<String>,
}

/// Route a gateway request, enforcing the method first.
pub fn dispatch(env: &MatchEnv, route: Route, request: &GatewayRequest) -> ApiResponse {
    let _span = tracing::info_span!("request", ?route, method = %request.http_method).entered();

    if request.http_method != ACCEPTED_METHOD {
        return respond(Err(MatchError::UnsupportedMethod {
            method: request.http_method.clone(),
        }));
    }

    let body = request.body.as_deref();
    match route {
        Route::Ingest => handle_ingest(env, body),
        Route::Trigger => handle_trigger(env, body),
    }
}

/// Parse a raw gateway event and dispatch it.
pub fn dispatch_raw(env: &MatchEnv, route: Route, event: &str) -> ApiResponse {
    match serde_json::from_str::<GatewayRequest>(event) {
        Ok(request) => dispatch(env, route, &request),
        Err(e) => respond(Err(MatchError::validation(format!(
            "request is not a gateway event: {e}"
        )))),
    }
}

/// Store a submission batch and echo it back.
pub fn handle_ingest(env: &MatchEnv, body: Option<&str>) -> ApiResponse {
    let result = required_body(body)
        .and_then(SubmissionBatch::from_json)
        .and_then(|batch| {
            let summary = pipeline::run_ingest(env, &batch)?;
            tracing::info!(stored = summary.total(), "Accepted batch");
            Ok(batch)
        })
        .and_then(|batch| to_json(&batch));
    respond(result)
}

/// Run the report for a match trigger event.
pub fn handle_trigger(env: &MatchEnv, body: Option<&str>) -> ApiResponse {
    let result = required_body(body)
        .and_then(|body| {
            serde_json::from_str::<TriggerRequest>(body)
                .map_err(|e| MatchError::validation(format!("trigger body is not valid: {e}")))
        })
        .and_then(|request| match request.event.as_deref() {
            Some(MATCH_TRIGGER_EVENT) => Ok(()),
            _ => Err(MatchError::UnsupportedEvent {
                event: request.event,
            }),
        })
        .and_then(|()| pipeline::run_match(env))
        .map(|report| {
            json!({
                "event": MATCH_TRIGGER_EVENT,
                "reportKey": report.key,
                "generatedAt": report.generated_at,
                "rows": report.rows,
            })
        });
    respond(result)
}

fn required_body(body: Option<&str>) -> Result<&str, MatchError> {
    body.filter(|b| !b.trim().is_empty())
        .ok_or_else(|| MatchError::validation("request body is missing"))
}

fn to_json<T: Serialize>(value: &T) -> Result<serde_json::Value, MatchError> {
    serde_json::to_value(value).map_err(|e| MatchError::Serialization {
        message: e.to_string(),
        rows: Vec::new(),
    })
}

fn respond(result: Result<serde_json::Value, MatchError>) -> ApiResponse {
    match result {
        Ok(body) => ApiResponse::ok(&body),
        Err(err) => {
            tracing::warn!(
                status = err.status_code(),
                kind = err.kind(),
                details = %err.details(),
                "{}",
                err
            );
            ApiResponse::from_error(&err)
        }
    }
}
