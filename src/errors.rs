//! Error type for callmatch operations.
//!
//! Every failure the core can produce is a [`MatchError`] variant. Variants
//! carry the context needed to reproduce the failure (item index, offending
//! number, computed rows) so they can be logged and returned to the caller
//! as a structured body instead of panicking.
//!
//! # Error Codes
//!
//! Error codes are assigned by category:
//! - E001-E009: submission errors (validation, discriminant, number format)
//! - E010-E019: record store errors
//! - E020-E029: report errors (serialization, upload)
//! - E030-E039: request boundary errors
//! - E040-E049: configuration errors
//!
//! # Example
//!
//! ```rust
//! use callmatch::errors::{ErrorCode, MatchError};
//!
//! let err = MatchError::unsupported_type(1, "fax");
//! assert_eq!(err.code(), ErrorCode::UNSUPPORTED_TYPE);
//! assert_eq!(err.kind(), "UnsupportedTypeError");
//! assert_eq!(err.status_code(), 400);
//! ```

use crate::core::MatchedRow;
use serde::Serialize;
use serde_json::{json, Value};

/// Structured error code for documentation and programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ErrorCode(&'static str);

impl ErrorCode {
    /// Missing or malformed required field
    pub const VALIDATION: ErrorCode = ErrorCode("E001");
    /// Unknown submission item discriminant
    pub const UNSUPPORTED_TYPE: ErrorCode = ErrorCode("E002");
    /// Number too short for prefix extraction
    pub const INVALID_NUMBER_FORMAT: ErrorCode = ErrorCode("E003");

    /// Record store write failed
    pub const STORE_WRITE: ErrorCode = ErrorCode("E010");
    /// Record store read failed
    pub const STORE_READ: ErrorCode = ErrorCode("E011");

    /// Report could not be serialized
    pub const SERIALIZATION: ErrorCode = ErrorCode("E020");
    /// Report could not be uploaded
    pub const UPLOAD: ErrorCode = ErrorCode("E021");

    /// HTTP method not accepted by the entry point
    pub const UNSUPPORTED_METHOD: ErrorCode = ErrorCode("E030");
    /// Trigger event not recognised
    pub const UNSUPPORTED_EVENT: ErrorCode = ErrorCode("E031");

    /// Configuration error
    pub const CONFIG: ErrorCode = ErrorCode("E040");

    /// Get the error code string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Unified error type for ingestion and report generation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum MatchError {
    /// A submission (or one of its items) has missing or malformed fields.
    #[error("invalid submission{}: {}", item_label(.item, .id), .problems.join("; "))]
    Validation {
        /// Position of the offending item in the batch, if item-level.
        item: Option<usize>,
        /// Id of the offending item, when it could be read.
        id: Option<String>,
        /// Every problem found on the item.
        problems: Vec<String>,
    },

    /// A submission item carries an unknown `type` discriminant.
    #[error("unsupported item type \"{type_name}\" at item {item}")]
    UnsupportedType { item: usize, type_name: String },

    /// A call number is too short for the configured prefix extractor.
    /// `rows` holds the rows the rest of the snapshot produced.
    #[error("call {call_id}: number \"{number}\" is too short for {extractor}")]
    InvalidNumberFormat {
        call_id: String,
        number: String,
        extractor: String,
        rows: Vec<MatchedRow>,
    },

    /// The record store rejected a write. `committed` counts the items of
    /// the batch that were already written.
    #[error("failed to write {key} to table {table}: {message}")]
    StoreWrite {
        table: String,
        key: String,
        message: String,
        committed: usize,
    },

    /// The record store could not be read or returned undecodable records.
    #[error("failed to read table {table}: {message}")]
    StoreRead { table: String, message: String },

    /// The computed rows could not be serialized.
    #[error("failed to serialize report ({} rows): {message}", .rows.len())]
    Serialization {
        message: String,
        rows: Vec<MatchedRow>,
    },

    /// The serialized report could not be uploaded.
    #[error("failed to upload report to {key} ({} rows): {message}", .rows.len())]
    Upload {
        key: String,
        message: String,
        rows: Vec<MatchedRow>,
    },

    /// The entry point only accepts write requests.
    #[error("Unsupported method \"{method}\"")]
    UnsupportedMethod { method: String },

    /// The trigger body names an event other than the match trigger.
    #[error("Event is not supported.")]
    UnsupportedEvent { event: Option<String> },

    /// Configuration could not be loaded or is invalid.
    #[error("configuration error: {message}")]
    Config { message: String },
}

fn item_label(item: &Option<usize>, id: &Option<String>) -> String {
    match (item, id) {
        (Some(index), Some(id)) => format!(" (item {index}, id \"{id}\")"),
        (Some(index), None) => format!(" (item {index})"),
        (None, Some(id)) => format!(" (id \"{id}\")"),
        (None, None) => String::new(),
    }
}

impl MatchError {
    /// Create a request-level validation error with a single problem.
    #[must_use]
    pub fn validation(problem: impl Into<String>) -> Self {
        Self::Validation {
            item: None,
            id: None,
            problems: vec![problem.into()],
        }
    }

    /// Create an item-level validation error carrying every problem found.
    #[must_use]
    pub fn invalid_item(item: usize, id: Option<String>, problems: Vec<String>) -> Self {
        Self::Validation {
            item: Some(item),
            id,
            problems,
        }
    }

    #[must_use]
    pub fn unsupported_type(item: usize, type_name: impl Into<String>) -> Self {
        Self::UnsupportedType {
            item,
            type_name: type_name.into(),
        }
    }

    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Get the error code.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { .. } => ErrorCode::VALIDATION,
            Self::UnsupportedType { .. } => ErrorCode::UNSUPPORTED_TYPE,
            Self::InvalidNumberFormat { .. } => ErrorCode::INVALID_NUMBER_FORMAT,
            Self::StoreWrite { .. } => ErrorCode::STORE_WRITE,
            Self::StoreRead { .. } => ErrorCode::STORE_READ,
            Self::Serialization { .. } => ErrorCode::SERIALIZATION,
            Self::Upload { .. } => ErrorCode::UPLOAD,
            Self::UnsupportedMethod { .. } => ErrorCode::UNSUPPORTED_METHOD,
            Self::UnsupportedEvent { .. } => ErrorCode::UNSUPPORTED_EVENT,
            Self::Config { .. } => ErrorCode::CONFIG,
        }
    }

    /// Get the error kind name reported to callers.
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "ValidationError",
            Self::UnsupportedType { .. } => "UnsupportedTypeError",
            Self::InvalidNumberFormat { .. } => "InvalidNumberFormatError",
            Self::StoreWrite { .. } => "StoreWriteError",
            Self::StoreRead { .. } => "StoreReadError",
            Self::Serialization { .. } => "SerializationError",
            Self::Upload { .. } => "UploadError",
            Self::UnsupportedMethod { .. } => "UnsupportedMethodError",
            Self::UnsupportedEvent { .. } => "UnsupportedEventError",
            Self::Config { .. } => "ConfigError",
        }
    }

    /// HTTP-equivalent status for the request boundary.
    ///
    /// Problems with the submitted data are 400; collaborator and
    /// configuration failures are 500.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. }
            | Self::UnsupportedType { .. }
            | Self::InvalidNumberFormat { .. }
            | Self::UnsupportedMethod { .. }
            | Self::UnsupportedEvent { .. } => 400,
            Self::StoreWrite { .. }
            | Self::StoreRead { .. }
            | Self::Serialization { .. }
            | Self::Upload { .. }
            | Self::Config { .. } => 500,
        }
    }

    /// Whether re-running the same request may succeed.
    ///
    /// The core never retries; this is a hint for the invoking environment.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::StoreWrite { .. } | Self::StoreRead { .. } | Self::Upload { .. }
        )
    }

    /// Rows computed before a report failure, if any.
    #[must_use]
    pub fn computed_rows(&self) -> &[MatchedRow] {
        match self {
            Self::InvalidNumberFormat { rows, .. }
            | Self::Serialization { rows, .. }
            | Self::Upload { rows, .. } => rows,
            _ => &[],
        }
    }

    /// Attach the rows computed before a report failure.
    ///
    /// Only report errors carry rows; other variants are returned unchanged.
    #[must_use]
    pub fn with_rows(mut self, computed: Vec<MatchedRow>) -> Self {
        match &mut self {
            Self::InvalidNumberFormat { rows, .. }
            | Self::Serialization { rows, .. }
            | Self::Upload { rows, .. } => *rows = computed,
            _ => {}
        }
        self
    }

    /// Variant-specific context for the structured body.
    #[must_use]
    pub fn details(&self) -> Value {
        match self {
            Self::Validation { item, id, problems } => json!({
                "item": item,
                "id": id,
                "problems": problems,
            }),
            Self::UnsupportedType { item, type_name } => json!({
                "item": item,
                "type": type_name,
            }),
            Self::InvalidNumberFormat {
                call_id,
                number,
                extractor,
                rows,
            } => json!({
                "callId": call_id,
                "number": number,
                "extractor": extractor,
                "rows": rows,
            }),
            Self::StoreWrite {
                table,
                key,
                committed,
                ..
            } => json!({
                "table": table,
                "key": key,
                "committed": committed,
            }),
            Self::StoreRead { table, .. } => json!({ "table": table }),
            Self::Serialization { rows, .. } => json!({ "rows": rows }),
            Self::Upload { key, rows, .. } => json!({ "key": key, "rows": rows }),
            Self::UnsupportedMethod { method } => json!({ "method": method }),
            Self::UnsupportedEvent { event } => json!({ "event": event }),
            Self::Config { .. } => Value::Null,
        }
    }

    /// Structured representation returned to callers.
    #[must_use]
    pub fn to_body(&self) -> ErrorBody {
        ErrorBody {
            code: self.code(),
            kind: self.kind(),
            message: self.to_string(),
            retryable: self.is_retryable(),
            details: self.details(),
        }
    }
}

/// Serializable error body.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub code: ErrorCode,
    pub kind: &'static str,
    pub message: String,
    pub retryable: bool,
    pub details: Value,
}
