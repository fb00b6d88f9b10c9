use anyhow::Result;
use std::path::Path;

use super::{read_input, GlobalOptions};
use crate::api::{self, ApiResponse, Route};

/// `callmatch invoke --route <ROUTE> <FILE|->`
///
/// The input is a full gateway event (`{"httpMethod": ..., "body": ...}`),
/// so method routing applies.
pub fn run_invoke_command(
    options: &GlobalOptions,
    route: Route,
    input: &Path,
) -> Result<ApiResponse> {
    let env = options.build_env()?;
    let event = read_input(input)?;
    Ok(api::dispatch_raw(&env, route, &event))
}
