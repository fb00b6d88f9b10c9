//! Validation with error accumulation for configuration.
//!
//! Every section is checked independently and all problems are reported
//! together, so a broken config file can be fixed in one pass.

use crate::effects::{combine_validations, field_failure, field_success, into_problems, FieldValidation};
use crate::errors::MatchError;

use super::core::{CallmatchConfig, ReportConfig, TablesConfig};

/// Validate entire config, accumulating ALL errors.
///
/// # Example
///
/// ```rust
/// use callmatch::config::{validation::validate_config, CallmatchConfig};
///
/// let validation = validate_config(&CallmatchConfig::default());
/// assert!(validation.is_success());
/// ```
pub fn validate_config(config: &CallmatchConfig) -> FieldValidation<()> {
    let validations = vec![
        validate_name("tables.calls", &config.tables.calls),
        validate_name("tables.operators", &config.tables.operators),
        validate_distinct_tables(&config.tables),
        validate_name("report.bucket", &config.report.bucket),
        validate_report_key(&config.report),
    ];

    combine_validations(validations).map(|_| ())
}

/// Validate config with a `Result` API, folding all problems into one
/// configuration error.
pub fn validate_config_result(config: &CallmatchConfig) -> Result<(), MatchError> {
    into_problems(validate_config(config)).map_err(|problems| MatchError::config(problems.join("; ")))
}

fn validate_name(field: &str, value: &str) -> FieldValidation<()> {
    if value.is_empty() {
        return field_failure(format!("{field} must not be empty"));
    }
    let plain = value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'));
    if !plain || value == "." || value == ".." {
        return field_failure(format!(
            "{field} may only contain ASCII letters, digits, '-', '_' and '.' (got {value:?})"
        ));
    }
    field_success(())
}

fn validate_distinct_tables(tables: &TablesConfig) -> FieldValidation<()> {
    if tables.calls == tables.operators {
        field_failure(format!(
            "tables.calls and tables.operators must differ (both {:?})",
            tables.calls
        ))
    } else {
        field_success(())
    }
}

fn validate_report_key(report: &ReportConfig) -> FieldValidation<()> {
    let key = report.key.trim_start_matches('/');
    if key.is_empty() {
        field_failure("report.key must not be empty")
    } else if key.ends_with('/') {
        field_failure(format!("report.key must name an object, not a folder (got {:?})", report.key))
    } else if key.split('/').any(|segment| segment == ".." || segment == ".") {
        field_failure(format!("report.key must not contain relative segments (got {:?})", report.key))
    } else {
        field_success(())
    }
}
