use std::fs;
use std::path::{Path, PathBuf};

use super::core::CallmatchConfig;
use super::validation::validate_config_result;
use crate::errors::MatchError;

/// File name searched for in the working directory and its ancestors.
pub const CONFIG_FILE_NAME: &str = ".callmatch.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Pure function to parse and validate config from TOML string
pub fn parse_and_validate_config(contents: &str) -> Result<CallmatchConfig, MatchError> {
    let config = toml::from_str::<CallmatchConfig>(contents)
        .map_err(|e| MatchError::config(format!("failed to parse {}: {}", CONFIG_FILE_NAME, e)))?;
    validate_config_result(&config)?;
    Ok(config)
}

/// Load an explicitly named config file. A missing file is an error.
pub fn load_config_from_path(path: &Path) -> Result<CallmatchConfig, MatchError> {
    let contents = fs::read_to_string(path)
        .map_err(|e| MatchError::config(format!("failed to read {}: {}", path.display(), e)))?;
    let config = parse_and_validate_config(&contents)?;
    tracing::debug!(path = %path.display(), "Loaded config");
    Ok(config)
}

/// Pure function to generate directory ancestors up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Find the nearest config file walking up from `start`.
pub fn discover_config_file(start: PathBuf) -> Option<PathBuf> {
    directory_ancestors(start, MAX_TRAVERSAL_DEPTH)
        .map(|dir| dir.join(CONFIG_FILE_NAME))
        .find(|candidate| candidate.is_file())
}

/// Load configuration.
///
/// With an explicit path that file must exist and be valid. Otherwise the
/// nearest `.callmatch.toml` above the current directory is used, and
/// defaults apply when none is found. A discovered file that fails to parse
/// is an error.
pub fn load_config(explicit: Option<&Path>) -> Result<CallmatchConfig, MatchError> {
    if let Some(path) = explicit {
        return load_config_from_path(path);
    }

    let current = match std::env::current_dir() {
        Ok(dir) => dir,
        Err(e) => {
            tracing::warn!("Failed to get current directory: {}. Using default config.", e);
            return Ok(CallmatchConfig::default());
        }
    };

    match discover_config_file(current) {
        Some(path) => load_config_from_path(&path),
        None => {
            tracing::debug!(
                "No config found after checking {} directories. Using default config.",
                MAX_TRAVERSAL_DEPTH
            );
            Ok(CallmatchConfig::default())
        }
    }
}
