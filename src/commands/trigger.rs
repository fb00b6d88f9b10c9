use anyhow::{Context, Result};
use comfy_table::{presets::UTF8_FULL, ContentArrangement, Table};
use serde_json::json;

use super::GlobalOptions;
use crate::api::{self, ApiResponse};
use crate::core::MatchedRow;
use crate::env::MatchEnv;
use crate::report::parse_rows;
use crate::store::FsBlobStore;

/// `callmatch trigger [--event <TEXT>] [--print]`
///
/// With `print`, the published report is read back from the blob store,
/// parsed, and rendered after the response.
pub fn run_trigger_command(
    options: &GlobalOptions,
    event: &str,
    print: bool,
) -> Result<(ApiResponse, Option<String>)> {
    let config = options.resolve_config()?;
    let env = MatchEnv::on_disk(config.clone());
    let body = json!({ "event": event }).to_string();
    let response = api::handle_trigger(&env, Some(&body));

    if !print || !response.is_success() {
        return Ok((response, None));
    }

    let key = response
        .json_body()?
        .get("reportKey")
        .and_then(|k| k.as_str().map(str::to_string))
        .context("Trigger response has no reportKey")?;
    let blobs = FsBlobStore::new(&config.storage.data_dir, &config.report.bucket);
    let bytes = blobs
        .read(&key)
        .with_context(|| format!("Failed to read back report {key}"))?;
    let rows = parse_rows(&bytes)?;

    Ok((response, Some(render_rows(&rows))))
}

/// Render report rows as a terminal table.
pub fn render_rows(rows: &[MatchedRow]) -> String {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Call", "Date", "Number", "Operator", "Risk"]);
    for row in rows {
        table.add_row(row.fields().to_vec());
    }
    table.to_string()
}
