//! CLI command implementations.
//!
//! Available commands:
//! - **ingest**: validate and store a submission batch
//! - **trigger**: generate and publish the match report
//! - **invoke**: run a raw gateway event through method routing
//! - **init**: write a default `.callmatch.toml`
//!
//! Commands that go through the request boundary return the
//! [`ApiResponse`] so the binary can print it and pick the exit status.

pub mod ingest;
pub mod init;
pub mod invoke;
pub mod trigger;

pub use ingest::run_ingest_command;
pub use init::init_config;
pub use invoke::run_invoke_command;
pub use trigger::{render_rows, run_trigger_command};

use anyhow::{Context, Result};
use std::io::Read;
use std::path::{Path, PathBuf};

use crate::api::ApiResponse;
use crate::config::{load_config, CallmatchConfig};
use crate::env::MatchEnv;

/// Options shared by every command.
#[derive(Debug, Clone, Default)]
pub struct GlobalOptions {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
}

impl GlobalOptions {
    /// Load the configuration and apply command-line overrides.
    pub fn resolve_config(&self) -> Result<CallmatchConfig> {
        let mut config = load_config(self.config.as_deref())?;
        if let Some(data_dir) = &self.data_dir {
            config.storage.data_dir = data_dir.clone();
        }
        tracing::debug!(data_dir = %config.storage.data_dir.display(), "Resolved configuration");
        Ok(config)
    }

    pub fn build_env(&self) -> Result<MatchEnv> {
        Ok(MatchEnv::on_disk(self.resolve_config()?))
    }
}

/// Read a file, or stdin when `path` is `-`.
pub fn read_input(path: &Path) -> Result<String> {
    if path.as_os_str() == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read stdin")?;
        Ok(buf)
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))
    }
}

/// Pretty-print a response body, falling back to the raw text.
pub fn format_body(response: &ApiResponse) -> String {
    response
        .json_body()
        .ok()
        .and_then(|body| serde_json::to_string_pretty(&body).ok())
        .unwrap_or_else(|| response.body.clone())
}
