use anyhow::Result;
use std::path::Path;

use super::{read_input, GlobalOptions};
use crate::api::{self, ApiResponse};

/// `callmatch ingest <FILE|->`
pub fn run_ingest_command(options: &GlobalOptions, input: &Path) -> Result<ApiResponse> {
    let env = options.build_env()?;
    let body = read_input(input)?;
    Ok(api::handle_ingest(&env, Some(&body)))
}
